//! RFC 4648 base32 encoding, as used for usernames and share ids in URLs.

use data_encoding::BASE32_NOPAD;

/// Encode `input` as uppercase base32 with the `=` padding removed.
pub fn b32encode_trim(input: &str) -> String {
    BASE32_NOPAD.encode(input.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rfc4648_vectors() {
        assert_eq!(b32encode_trim(""), "");
        assert_eq!(b32encode_trim("f"), "MY");
        assert_eq!(b32encode_trim("fo"), "MZXQ");
        assert_eq!(b32encode_trim("foo"), "MZXW6");
        assert_eq!(b32encode_trim("foob"), "MZXW6YQ");
        assert_eq!(b32encode_trim("fooba"), "MZXW6YTB");
        assert_eq!(b32encode_trim("foobar"), "MZXW6YTBOI");
    }

    #[test]
    fn test_username() {
        assert_eq!(b32encode_trim("alice"), "MFWGSY3F");
    }
}
