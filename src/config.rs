/*!
Codec configuration.
*/
use std::env;
use encoding_rs::{Encoding, WINDOWS_1252};
use thiserror::Error;
use tracing::debug;

/**
Upper bound on how many bytes are examined while looking for a terminator.

This is the longest string the R runtime can represent (`R_LEN_T_MAX`), so no well-formed string is ever cut off.
*/
pub const DEFAULT_SCAN_LIMIT: usize = 0x7FFF_FFFF;

/**
What to do with byte sequences that are not valid in the encoding they were detected as.

A codec applies one policy to every call; it never rejects some malformed input and repairs the rest.
*/
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum MalformedPolicy {
    /// Fail the decode with `DecodeError::Malformed`.
    #[default]
    Reject,
    /// Substitute U+FFFD for each malformed sequence.
    Replace,
}

#[derive(Copy, Clone, Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} is not ASCII-compatible and cannot serve as the system encoding")]
    NotAsciiCompatible(&'static str),
    #[error("scan limit must be non-zero")]
    ZeroScanLimit,
}

/**
Settings for a `Codec`.

Build with `CodecConfig::default()` or `CodecConfig::from_locale()`, then adjust with the `with_*` methods.
*/
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CodecConfig {
    scan_limit: usize,
    system_encoding: &'static Encoding,
    malformed: MalformedPolicy,
}

impl Default for CodecConfig {
    fn default() -> Self {
        CodecConfig {
            scan_limit: DEFAULT_SCAN_LIMIT,
            system_encoding: WINDOWS_1252,
            malformed: MalformedPolicy::Reject,
        }
    }
}

impl CodecConfig {
    /**
    Defaults, except that the system encoding is taken from the process locale.

    The locale is read from `LC_ALL`, `LC_CTYPE` and `LANG`, in that order, skipping unset or empty variables.  If the locale names no charset, an unknown one, or one that is not ASCII-compatible, the default system encoding is kept.
    */
    pub fn from_locale() -> Self {
        let config = CodecConfig::default();

        let locale = ["LC_ALL", "LC_CTYPE", "LANG"]
            .iter()
            .filter_map(|var| env::var(var).ok())
            .find(|value| !value.is_empty());

        let locale = match locale {
            Some(locale) => locale,
            None => return config,
        };

        match encoding_for_locale(&locale).map(|enc| config.with_system_encoding(enc)) {
            Some(Ok(config)) => config,
            Some(Err(err)) => {
                debug!(%locale, %err, "ignoring locale charset");
                config
            },
            None => {
                debug!(%locale, "locale names no known charset");
                config
            },
        }
    }

    /**
    Sets how many bytes may be examined while searching for a terminator.
    */
    pub fn with_scan_limit(self, limit: usize) -> Result<Self, ConfigError> {
        if limit == 0 {
            return Err(ConfigError::ZeroScanLimit);
        }
        Ok(CodecConfig { scan_limit: limit, ..self })
    }

    /**
    Sets the legacy encoding used for buffers the sniffer reports as `SystemDefault`.

    # Failure

    The encoding must be ASCII-compatible, since pure ASCII buffers are always decoded with it.
    */
    pub fn with_system_encoding(self, encoding: &'static Encoding) -> Result<Self, ConfigError> {
        if !encoding.is_ascii_compatible() {
            return Err(ConfigError::NotAsciiCompatible(encoding.name()));
        }
        Ok(CodecConfig { system_encoding: encoding, ..self })
    }

    pub fn with_malformed_policy(self, policy: MalformedPolicy) -> Self {
        CodecConfig { malformed: policy, ..self }
    }

    pub fn scan_limit(&self) -> usize {
        self.scan_limit
    }

    pub fn system_encoding(&self) -> &'static Encoding {
        self.system_encoding
    }

    pub fn malformed_policy(&self) -> MalformedPolicy {
        self.malformed
    }
}

/**
Extracts the charset from a POSIX (`lang_TERRITORY.charset@modifier`) or Windows (`Language_Country.codepage`) locale name.
*/
fn encoding_for_locale(locale: &str) -> Option<&'static Encoding> {
    let (_, charset) = locale.split_once('.')?;
    let charset = charset.split('@').next().unwrap_or(charset);

    if !charset.is_empty() && charset.bytes().all(|b| b.is_ascii_digit()) {
        // Windows code page number.
        return Encoding::for_label(format!("cp{}", charset).as_bytes())
            .or_else(|| Encoding::for_label(format!("windows-{}", charset).as_bytes()));
    }

    Encoding::for_label(charset.as_bytes())
}
