use std::str::FromStr;

use cron::Schedule;

/// Checks a five-field cron expression, or six fields with leading seconds.
pub fn validate_cron_expression(expression: &str) -> Result<(), String> {
    let fields = expression.split_whitespace().count();
    let normalized = match fields {
        5 => format!("0 {}", expression.trim()),
        6 => expression.trim().to_string(),
        n => return Err(format!("expected 5 or 6 fields, found {n}")),
    };

    Schedule::from_str(&normalized)
        .map(|_| ())
        .map_err(|err| err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_common_expressions() {
        for expr in [
            "*/5 * * * *",
            "0 */1 * * *",
            "0 9-17 * * Mon-Fri",
            "30 2 1,15 1,7 *",
            "*/10 * * * * *",
        ] {
            assert!(validate_cron_expression(expr).is_ok(), "{expr}");
        }
    }

    #[test]
    fn rejects_malformed_expressions() {
        for expr in ["", "* * * *", "60 * * * *", "* 24 * * *", "* * * foo *", "every night"] {
            assert!(validate_cron_expression(expr).is_err(), "{expr}");
        }
    }
}
