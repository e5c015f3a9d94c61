use super::{CompressorErrors, MAX_LABEL_LEN, MAX_NAME_LEN, POINTER_FLAG, POINTER_MAX_OFFSET};
use std::collections::HashMap;

/// Writes domain names into a DNS message buffer.
#[derive(PartialEq, Eq, Hash)]
pub struct MessageCompressor {}

impl MessageCompressor {
    /// Reference to RFC1035, page 30 (4.1.4)
    ///
    /// In order to reduce the size of messages, the domain system utilizes a
    /// compression scheme which eliminates the repetition of domain names in a
    /// message.  In this scheme, an entire domain name or a list of labels at
    /// the end of a domain name is replaced with a pointer to a prior occurance
    /// of the same name.
    ///
    /// The pointer takes the form of a two octet sequence:
    ///
    ///   +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
    ///   | 1  1|                OFFSET                   |
    ///   +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
    ///
    /// `message` must be the whole message written so far (offsets are taken from
    /// its start) and `pointer_map` must be shared across every name of that message.
    ///
    /// A single trailing dot is accepted, `""` and `"."` encode the root name.
    pub fn compress(
        name: &str,
        message: &mut Vec<u8>,
        pointer_map: &mut HashMap<String, usize>,
    ) -> Result<(), CompressorErrors> {
        let labels = split_labels(name)?;
        // pointer_map -> (suffix, position)
        let mut position = message.len();

        for i in 0..labels.len() {
            let suffix = labels[i..].join(".");

            match pointer_map.get(&suffix) {
                Some(&offset) if offset <= POINTER_MAX_OFFSET => {
                    let pointer = (u16::from(POINTER_FLAG) << 8) | offset as u16;
                    message.extend_from_slice(&pointer.to_be_bytes());
                    return Ok(());
                }
                // offset too large to encode as a pointer; the label is written normally
                Some(_) => {}
                None => {
                    pointer_map.insert(suffix, position);
                }
            }

            let label = labels[i];
            message.push(label.len() as u8);
            message.extend_from_slice(label.as_bytes());
            position += 1 + label.len();
        }

        message.push(0);
        Ok(())
    }
}

/// Encodes `name` as an uncompressed label sequence terminated by the root label.
///
/// `"google.com"` becomes `06 'g' 'o' 'o' 'g' 'l' 'e' 03 'c' 'o' 'm' 00`.
pub fn encode_name(name: &str) -> Result<Vec<u8>, CompressorErrors> {
    let mut message = Vec::with_capacity(name.len() + 2);
    let mut pointer_map = HashMap::new();
    MessageCompressor::compress(name, &mut message, &mut pointer_map)?;
    Ok(message)
}

/// Splits a presentation-format name into labels and validates the RFC 1035 limits.
///
/// Escaped dots inside a label are not supported.
fn split_labels(name: &str) -> Result<Vec<&str>, CompressorErrors> {
    let trimmed = name.strip_suffix('.').unwrap_or(name);
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }

    let labels: Vec<&str> = trimmed.split('.').collect();
    // root label terminator
    let mut encoded_len = 1;

    for label in &labels {
        if label.is_empty() {
            return Err(CompressorErrors::EmptyLabel(name.to_string()));
        }
        if label.len() > MAX_LABEL_LEN {
            return Err(CompressorErrors::LabelTooLong(label.to_string()));
        }
        encoded_len += 1 + label.len();
    }

    if encoded_len > MAX_NAME_LEN {
        return Err(CompressorErrors::NameTooLong(name.to_string()));
    }

    Ok(labels)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_name_known_vector() {
        let bytes = encode_name("google.com").unwrap();
        let expected = [
            6u8, b'g', b'o', b'o', b'g', b'l', b'e', 3u8, b'c', b'o', b'm', 0u8,
        ];
        assert_eq!(bytes, expected);
    }

    #[test]
    fn test_encode_name_trailing_dot_is_ignored() {
        assert_eq!(
            encode_name("google.com.").unwrap(),
            encode_name("google.com").unwrap()
        );
    }

    #[test]
    fn test_compressor_compression_with_pointer() {
        let mut message = Vec::new();
        let mut pointer_map = HashMap::new();

        MessageCompressor::compress("example.com", &mut message, &mut pointer_map).unwrap();
        let first_len = message.len();

        // Reusing the same name should produce a pointer to offset 0
        MessageCompressor::compress("example.com", &mut message, &mut pointer_map).unwrap();

        let pointer_bytes = &message[first_len..];
        assert_eq!(pointer_bytes, &[0xC0, 0x00]);
    }

    #[test]
    fn test_compressor_multiple_labels_and_suffixes() {
        let mut message = vec![0u8; 12];
        let mut pointer_map = HashMap::new();

        MessageCompressor::compress("www.example.com", &mut message, &mut pointer_map).unwrap();
        let len_after_first = message.len();

        MessageCompressor::compress("mail.example.com", &mut message, &mut pointer_map).unwrap();

        // "mail" label followed by a pointer to "example.com" at 12 + 4
        assert_eq!(message[len_after_first], 4);
        let pointer_pos = len_after_first + 1 + 4;
        assert_eq!(&message[pointer_pos..], &[0xC0, 16]);
    }

    #[test]
    fn test_label_boundary() {
        let ok = format!("{}.com", "a".repeat(63));
        assert!(encode_name(&ok).is_ok());

        let too_long = format!("{}.com", "a".repeat(64));
        assert!(matches!(
            encode_name(&too_long),
            Err(CompressorErrors::LabelTooLong(_))
        ));
    }

    #[test]
    fn test_name_length_boundary() {
        // 3 * (1 + 63) + (1 + 61) + 1 = 255
        let max = format!("{0}.{0}.{0}.{1}", "a".repeat(63), "b".repeat(61));
        assert_eq!(encode_name(&max).unwrap().len(), 255);

        let over = format!("{0}.{0}.{0}.{1}", "a".repeat(63), "b".repeat(62));
        assert!(matches!(
            encode_name(&over),
            Err(CompressorErrors::NameTooLong(_))
        ));
    }

    #[test]
    fn test_empty_label_is_rejected() {
        assert!(matches!(
            encode_name("www..example.com"),
            Err(CompressorErrors::EmptyLabel(_))
        ));
        assert!(matches!(
            encode_name(".com"),
            Err(CompressorErrors::EmptyLabel(_))
        ));
    }

    #[test]
    fn test_compressor_root_label() {
        assert_eq!(encode_name(".").unwrap(), vec![0u8]);
        assert_eq!(encode_name("").unwrap(), vec![0u8]);
    }
}
