//! Password acceptability gate for registration.
//!
//! Two layers: four explicit character requirements, plus a strength score
//! (0–4) from the zxcvbn heuristic that must reach at least 3. Both are
//! returned to the client so it can render the checklist and strength meter.

use serde::Serialize;

/// Special characters accepted by the requirement check.
pub const SPECIAL_CHARS: &str = "!@#$%^&*(),.?\":{}|<>";

const MIN_LENGTH: usize = 8;
const MIN_STRENGTH_SCORE: u8 = 3;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordCheck {
    pub min_length: bool,
    pub has_digit: bool,
    pub has_uppercase: bool,
    pub has_special: bool,
    /// zxcvbn score, 0 (weakest) to 4 (strongest).
    pub strength_score: u8,
}

impl PasswordCheck {
    /// True when every requirement holds and the strength gate passes.
    pub fn acceptable(&self) -> bool {
        self.min_length
            && self.has_digit
            && self.has_uppercase
            && self.has_special
            && self.strength_score >= MIN_STRENGTH_SCORE
    }
}

/// Evaluates the password against all requirements and the strength heuristic.
pub fn check_password(password: &str) -> PasswordCheck {
    let strength_score = zxcvbn::zxcvbn(password, &[])
        .map(|entropy| entropy.score())
        .unwrap_or(0);

    PasswordCheck {
        min_length: password.chars().count() >= MIN_LENGTH,
        has_digit: password.chars().any(|c| c.is_ascii_digit()),
        has_uppercase: password.chars().any(|c| c.is_ascii_uppercase()),
        has_special: password.chars().any(|c| SPECIAL_CHARS.contains(c)),
        strength_score,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_common_password_fails_every_character_requirement_but_length() {
        let check = check_password("password");
        assert!(check.min_length);
        assert!(!check.has_digit);
        assert!(!check.has_uppercase);
        assert!(!check.has_special);
        assert!(!check.acceptable());
    }

    #[test]
    fn test_character_requirements_each_detected() {
        let check = check_password("P@ssw0rd123");
        assert!(check.min_length);
        assert!(check.has_digit);
        assert!(check.has_uppercase);
        assert!(check.has_special);
    }

    #[test]
    fn test_short_password_fails_length() {
        assert!(!check_password("P@s1").min_length);
    }

    #[test]
    fn test_strong_random_password_is_acceptable() {
        // Long, non-dictionary, mixed classes: clears the zxcvbn gate too.
        let check = check_password("qT7#mWzr!vK2pX?9");
        assert!(check.min_length && check.has_digit && check.has_uppercase && check.has_special);
        assert!(check.strength_score >= 3, "score was {}", check.strength_score);
        assert!(check.acceptable());
    }

    #[test]
    fn test_weak_but_compliant_password_is_rejected_by_strength_gate() {
        // Meets all four character rules yet stays guessable.
        let check = check_password("Password1!");
        assert!(check.has_digit && check.has_uppercase && check.has_special);
        assert!(check.strength_score < 3);
        assert!(!check.acceptable());
    }

    #[test]
    fn test_empty_password_scores_zero() {
        let check = check_password("");
        assert_eq!(check.strength_score, 0);
        assert!(!check.acceptable());
    }
}
