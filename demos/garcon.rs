extern crate nativestr;

use nativestr::{detect, Codec, CodecConfig, NativeHandle, NoSentinel};
use tracing_subscriber::EnvFilter;

// cp1252
const WORD_LEGACY: &'static [u8] = b"g\xaar\xe7on\0";
// utf-8
const WORD_UTF8: &'static [u8] = b"g\xc2\xaar\xc3\xa7on\0";

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = CodecConfig::from_locale();
    println!("system encoding: {}", config.system_encoding().name());
    let codec = Codec::new(config);

    for word in &[WORD_LEGACY, WORD_UTF8] {
        let content = &word[..word.len() - 1];
        println!("bytes: {:?}", content);
        println!("detected: {}", detect(content));

        let handle = NativeHandle::from_ptr(word.as_ptr());
        match unsafe { codec.decode(handle, &NoSentinel) } {
            Ok(s) => println!("via nativestr: {:?}", s),
            Err(err) => println!("couldn't decode: {}", err),
        }
    }

    match codec.encode("gªrçon") {
        Ok(buf) => println!("encoded: {:?} {:?}", buf, buf.as_bytes_with_nul()),
        Err(err) => println!("couldn't encode: {}", err),
    }
}
