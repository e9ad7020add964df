/*!
Additional documentation.

# How detection works

`encoding::detect` looks at the bytes of a string, *excluding* the terminator, and picks exactly one encoding.

1. Byte-order marks, if there are at least three bytes:

   | Leading bytes | Result |
   | ------------- | ------ |
   | `EF BB BF` | `Utf8` |
   | `FE FF 00` | `Utf16Be` |
   | `FF FE` then `01`–`7F` | `Utf16Le` |

2. Otherwise, a UTF-8 score: the percentage of non-ASCII bytes that belong to a well-formed 2, 3 or 4 byte sequence.

   | Condition | Result |
   | --------- | ------ |
   | all bytes ASCII | score 0 |
   | score > 98 | `Utf8` |
   | 95 < score ≤ 98, more than 30 good bytes | `Utf8` |
   | anything else | `SystemDefault` |

3. `SystemDefault` is decoded with `CodecConfig::system_encoding`, which defaults to windows-1252 and can be taken from the locale with `CodecConfig::from_locale`.

# What decoding guarantees

* The NA sentinel is `None`.  It is never read, and never turned into `"NA"` unless you ask for `decode_display`.

* A missing terminator is an error.  The search gives up after `CodecConfig::scan_limit` bytes.

* Malformed input is either always rejected or always replaced with U+FFFD, depending on `MalformedPolicy`.  The default is to reject.

* `decode(encode(s)) == s` for any `s` with no U+0000, and not starting with U+FEFF.  The first stops the foreign side reading early; the second reads back as a byte-order mark.

# Common Misconceptions and Mistakes

* *"ASCII is UTF-8, so pure ASCII should be detected as UTF-8."*  It is also windows-1252, Shift_JIS, and nearly everything else.  Detection says `SystemDefault`, which decodes it identically.

* *"If it decodes as UTF-8, it is UTF-8."*  Latin-1 text sometimes forms valid two-byte sequences by accident.  That is why short buffers need a near-perfect score.

* *"A UTF-16 string can be read up to its terminator."*  Not a byte-wise one: the high byte of the first ASCII unit is zero.  Only the byte-order mark and the first unit survive, which is exactly what the three-byte mark check looks at.

* *"The foreign runtime will free what we allocate."*  Only with the allocator it expects.  Use `NativeBuf<Malloc>` for anything that will be passed to `free`.
*/
