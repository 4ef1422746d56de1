#[cfg(test)]
mod tests {
    use crate::manager::generate_code_for_test;
    use crate::{OtpError, OtpManager, CODE_LENGTH};
    use proptest::prelude::*;

    proptest! {
        // Test that every generated code is a 6-digit number in range
        #[test]
        fn test_codes_are_six_digits(_seed in 0u32..1000) {
            let code = generate_code_for_test();
            prop_assert_eq!(code.len(), CODE_LENGTH);
            prop_assert!(code.chars().all(|c| c.is_ascii_digit()));
            let value: u32 = code.parse().unwrap();
            prop_assert!((100_000..=999_999).contains(&value));
        }

        // Test that any code other than the issued one is rejected and leaves the record
        #[test]
        fn test_any_wrong_code_is_rejected(guess in 0u32..1_000_000, phone_tail in 1000u32..9999) {
            let manager = OtpManager::in_memory(300);
            let phone = format!("+96650000{phone_tail}");
            let issued = manager.issue(&phone, None);
            let guess = format!("{guess:06}");
            prop_assume!(guess != issued.code);

            prop_assert_eq!(manager.verify(&phone, &guess), Err(OtpError::InvalidCode));
            prop_assert_eq!(manager.pending(), 1);
            prop_assert_eq!(manager.verify(&phone, &issued.code), Ok(None));
        }
    }
}
