use super::{CompressorErrors, MAX_NAME_LEN, POINTER_FLAG};

/// Decodes the domain name starting at `offset` inside `buffer`.
///
/// `buffer` must be the complete DNS message, since compression pointers are
/// offsets from its first octet. Returns the name in presentation form (labels
/// joined by `.`, the root name as `"."`) and the offset of the first octet
/// following the name *at its original position*: a pointer only supplies more
/// labels, the returned cursor stops right after the 2-octet pointer itself.
///
/// The number of pointer hops is bounded by the buffer length, so a pointer
/// chain that loops fails with [`CompressorErrors::CompressionLoop`] instead of
/// spinning forever.
pub fn decode_name(buffer: &[u8], offset: usize) -> Result<(String, usize), CompressorErrors> {
    let mut labels: Vec<String> = Vec::new();
    let mut cursor = offset;
    // Set on the first pointer, the jump target never moves the caller's cursor.
    let mut resume_at: Option<usize> = None;
    let mut hops = 0usize;
    // root label terminator
    let mut expanded_len = 1usize;

    loop {
        let len_octet = *buffer
            .get(cursor)
            .ok_or(CompressorErrors::TruncatedName(cursor))?;

        match len_octet & POINTER_FLAG {
            POINTER_FLAG => {
                let low = *buffer
                    .get(cursor + 1)
                    .ok_or(CompressorErrors::TruncatedName(cursor))?;
                let target = (usize::from(len_octet & !POINTER_FLAG) << 8) | usize::from(low);

                if resume_at.is_none() {
                    resume_at = Some(cursor + 2);
                }

                hops += 1;
                if hops > buffer.len() {
                    return Err(CompressorErrors::CompressionLoop(target));
                }
                if target >= buffer.len() {
                    return Err(CompressorErrors::PointerOutOfRange {
                        pointer: target,
                        len: buffer.len(),
                    });
                }

                cursor = target;
            }
            0 => {
                if len_octet == 0 {
                    cursor += 1;
                    break;
                }

                let start = cursor + 1;
                let end = start + usize::from(len_octet);
                let label = buffer
                    .get(start..end)
                    .ok_or(CompressorErrors::TruncatedName(cursor))?;

                expanded_len += 1 + label.len();
                if expanded_len > MAX_NAME_LEN {
                    return Err(CompressorErrors::NameTooLong(labels.join(".")));
                }

                labels.push(String::from_utf8_lossy(label).into_owned());
                cursor = end;
            }
            // 01 and 10 are reserved for future use
            _ => return Err(CompressorErrors::ReservedLabelType(len_octet)),
        }
    }

    let name = if labels.is_empty() {
        ".".to_string()
    } else {
        labels.join(".")
    };

    Ok((name, resume_at.unwrap_or(cursor)))
}
