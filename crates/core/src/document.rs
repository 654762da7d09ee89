//! Brazilian document-number validation (CPF, CNPJ, postal codes).
//!
//! Numbers are accepted with or without the usual punctuation
//! (`529.982.247-25`, `11.222.333/0001-81`); only the digits are checked.

/// Strip everything that is not an ASCII digit.
pub fn digits_of(input: &str) -> String {
    input.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Validate a CPF (11 digits, two check digits).
///
/// Rejects wrong length, repeated-digit sequences (`111.111.111-11`
/// passes the checksum but is not a real CPF), and checksum mismatches.
pub fn validate_cpf(input: &str) -> bool {
    let digits = digits_of(input);
    if digits.len() != 11 {
        return false;
    }
    let d: Vec<u32> = digits.chars().filter_map(|c| c.to_digit(10)).collect();
    if d.windows(2).all(|w| w[0] == w[1]) {
        return false;
    }

    let first = cpf_check_digit(&d[..9], 10);
    let second = cpf_check_digit(&d[..10], 11);
    d[9] == first && d[10] == second
}

/// Compute one CPF check digit over `digits`, starting from `weight`.
fn cpf_check_digit(digits: &[u32], weight: u32) -> u32 {
    let sum: u32 = digits
        .iter()
        .zip((2..=weight).rev())
        .map(|(d, w)| d * w)
        .sum();
    match sum % 11 {
        0 | 1 => 0,
        r => 11 - r,
    }
}

/// Validate a CNPJ (14 digits, two check digits).
pub fn validate_cnpj(input: &str) -> bool {
    let digits = digits_of(input);
    if digits.len() != 14 {
        return false;
    }
    let d: Vec<u32> = digits.chars().filter_map(|c| c.to_digit(10)).collect();
    if d.windows(2).all(|w| w[0] == w[1]) {
        return false;
    }

    const FIRST_WEIGHTS: [u32; 12] = [5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2];
    const SECOND_WEIGHTS: [u32; 13] = [6, 5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2];

    let first = cnpj_check_digit(&d[..12], &FIRST_WEIGHTS);
    let second = cnpj_check_digit(&d[..13], &SECOND_WEIGHTS);
    d[12] == first && d[13] == second
}

fn cnpj_check_digit(digits: &[u32], weights: &[u32]) -> u32 {
    let sum: u32 = digits.iter().zip(weights).map(|(d, w)| d * w).sum();
    match sum % 11 {
        0 | 1 => 0,
        r => 11 - r,
    }
}

/// Postal codes (CEP) are exactly eight digits.
pub fn validate_postal_code(input: &str) -> bool {
    let digits = digits_of(input);
    digits.len() == 8 && digits.len() == input.chars().filter(|c| *c != '-').count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cpf_valid_plain() {
        assert!(validate_cpf("11144477735"));
    }

    #[test]
    fn cpf_valid_formatted() {
        assert!(validate_cpf("529.982.247-25"));
    }

    #[test]
    fn cpf_bad_checksum() {
        assert!(!validate_cpf("12345678901"));
    }

    #[test]
    fn cpf_repeated_digits() {
        assert!(!validate_cpf("111.111.111-11"));
    }

    #[test]
    fn cpf_wrong_length() {
        assert!(!validate_cpf("1114447773"));
        assert!(!validate_cpf(""));
    }

    #[test]
    fn cnpj_valid() {
        assert!(validate_cnpj("11.222.333/0001-81"));
        assert!(validate_cnpj("11222333000181"));
    }

    #[test]
    fn cnpj_bad_checksum() {
        assert!(!validate_cnpj("11.222.333/0001-82"));
    }

    #[test]
    fn cnpj_repeated_digits() {
        assert!(!validate_cnpj("11111111111111"));
    }

    #[test]
    fn postal_code_accepts_eight_digits() {
        assert!(validate_postal_code("01310100"));
        assert!(validate_postal_code("01310-100"));
    }

    #[test]
    fn postal_code_rejects_short_or_lettered() {
        assert!(!validate_postal_code("0131010"));
        assert!(!validate_postal_code("01310-10a"));
    }
}
