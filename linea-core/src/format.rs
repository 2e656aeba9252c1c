//! Number rendering shared by step traces and result text

/// Fixed-point rendering with `decimals` digits after the point.
///
/// Negative zero renders as zero.
pub fn fixed(x: f64, decimals: usize) -> String {
    if x.is_infinite() {
        return plain(x);
    }
    format!("{:.*}", decimals, x + 0.0)
}

/// Shortest round-trip rendering: `1`, `-2`, `0.5`, `0.30000000000000004`
pub fn plain(x: f64) -> String {
    if x.is_infinite() {
        return if x > 0.0 { "Infinity".to_string() } else { "-Infinity".to_string() };
    }
    format!("{}", x + 0.0)
}

/// `re+|im|i` or `re-|im|i`, both parts fixed-point
pub fn complex(re: f64, im: f64, decimals: usize) -> String {
    let sign = if im >= 0.0 { '+' } else { '-' };
    format!("{}{}{}i", fixed(re, decimals), sign, fixed(im.abs(), decimals))
}

/// `[a, b, c]` with every entry fixed-point
pub fn fixed_list(values: &[f64], decimals: usize) -> String {
    let parts: Vec<String> = values.iter().map(|&v| fixed(v, decimals)).collect();
    format!("[{}]", parts.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed() {
        assert_eq!(fixed(1.0, 4), "1.0000");
        assert_eq!(fixed(0.5, 3), "0.500");
        assert_eq!(fixed(-0.0, 3), "0.000");
        assert_eq!(fixed(-2.26, 1), "-2.3");
    }

    #[test]
    fn test_plain() {
        assert_eq!(plain(1.0), "1");
        assert_eq!(plain(-2.0), "-2");
        assert_eq!(plain(0.5), "0.5");
        assert_eq!(plain(-0.0), "0");
        assert_eq!(plain(f64::INFINITY), "Infinity");
    }

    #[test]
    fn test_complex() {
        assert_eq!(complex(1.0, 2.0, 4), "1.0000+2.0000i");
        assert_eq!(complex(1.0, -2.0, 4), "1.0000-2.0000i");
        assert_eq!(complex(-0.5, 0.0, 4), "-0.5000+0.0000i");
    }

    #[test]
    fn test_fixed_list() {
        assert_eq!(fixed_list(&[0.0, 0.0, 1.0], 4), "[0.0000, 0.0000, 1.0000]");
        assert_eq!(fixed_list(&[], 4), "[]");
    }
}
