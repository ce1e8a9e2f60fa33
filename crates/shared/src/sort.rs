use std::cmp::Ordering;

/// Compares two filenames the way a file manager does: runs of ASCII
/// digits are compared by numeric value, everything else byte by byte
/// and case-insensitively. Load-bearing for cropped-file sequences,
/// where `crop2` must sort before `crop10`.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    let (mut i, mut j) = (0, 0);

    while i < a.len() && j < b.len() {
        if a[i].is_ascii_digit() && b[j].is_ascii_digit() {
            let a_start = i;
            while i < a.len() && a[i].is_ascii_digit() {
                i += 1;
            }
            let b_start = j;
            while j < b.len() && b[j].is_ascii_digit() {
                j += 1;
            }

            // Compare by numeric value without parsing: strip leading
            // zeros, then a longer run is the larger number and equal
            // lengths compare digit-wise.
            let a_num = strip_leading_zeros(&a[a_start..i]);
            let b_num = strip_leading_zeros(&b[b_start..j]);
            let ord = a_num
                .len()
                .cmp(&b_num.len())
                .then_with(|| a_num.cmp(b_num));
            if ord != Ordering::Equal {
                return ord;
            }
        } else {
            let ac = a[i].to_ascii_lowercase();
            let bc = b[j].to_ascii_lowercase();
            if ac != bc {
                return ac.cmp(&bc);
            }
            i += 1;
            j += 1;
        }
    }

    (a.len() - i).cmp(&(b.len() - j))
}

fn strip_leading_zeros(digits: &[u8]) -> &[u8] {
    let first = digits
        .iter()
        .position(|d| *d != b'0')
        .unwrap_or(digits.len() - 1);
    &digits[first..]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digit_runs_compare_numerically() {
        assert_eq!(natural_cmp("img_crop2.png", "img_crop10.png"), Ordering::Less);
        assert_eq!(natural_cmp("img_crop10.png", "img_crop2.png"), Ordering::Greater);
        assert_eq!(natural_cmp("img_crop3.png", "img_crop3.png"), Ordering::Equal);
    }

    #[test]
    fn test_leading_zeros() {
        assert_eq!(natural_cmp("img007.png", "img7.png"), Ordering::Equal);
        assert_eq!(natural_cmp("img007.png", "img8.png"), Ordering::Less);
    }

    #[test]
    fn test_case_insensitive_text() {
        assert_eq!(natural_cmp("IMG_1.png", "img_1.png"), Ordering::Equal);
        assert_eq!(natural_cmp("a2.png", "B1.png"), Ordering::Less);
    }

    #[test]
    fn test_prefix_sorts_first() {
        assert_eq!(natural_cmp("img", "img2"), Ordering::Less);
        assert_eq!(natural_cmp("img2x", "img2"), Ordering::Greater);
    }

    #[test]
    fn test_full_sequence_order() {
        let mut names = vec![
            "photo_crop10.png",
            "photo_crop1.png",
            "photo_crop21.png",
            "photo_crop2.png",
            "photo_crop3.png",
        ];
        names.sort_by(|a, b| natural_cmp(a, b));
        assert_eq!(
            names,
            vec![
                "photo_crop1.png",
                "photo_crop2.png",
                "photo_crop3.png",
                "photo_crop10.png",
                "photo_crop21.png",
            ]
        );
    }
}
