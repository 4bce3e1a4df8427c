//! Validation utilities for the Logistics Portal

use rust_decimal::Decimal;

use crate::models::OrderCheckpoints;

// ============================================================================
// Order and Movement Validations
// ============================================================================

/// Longest accepted D.O. code
pub const MAX_ORDER_CODE_LEN: usize = 32;

/// Validate D.O. code format (alphanumerics plus `-`, `/`, `.`)
pub fn validate_order_code(code: &str) -> Result<(), &'static str> {
    let code = code.trim();
    if code.is_empty() {
        return Err("Order code is required");
    }
    if code.len() > MAX_ORDER_CODE_LEN {
        return Err("Order code must be at most 32 characters");
    }
    if !code
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '/' | '.'))
    {
        return Err("Order code may only contain letters, digits, '-', '/' and '.'");
    }
    Ok(())
}

/// Validate package count and gross weight of a movement
pub fn validate_movement_quantities(
    packages: i32,
    gross_weight_kg: Decimal,
) -> Result<(), &'static str> {
    if packages < 0 {
        return Err("Package count cannot be negative");
    }
    if gross_weight_kg < Decimal::ZERO {
        return Err("Gross weight cannot be negative");
    }
    Ok(())
}

/// Longest accepted checkpoint reference (form numbers, release refs)
pub const MAX_CHECKPOINT_LEN: usize = 64;

/// Check checkpoint reference lengths; the error names the offending field
pub fn validate_checkpoints(
    checkpoints: &OrderCheckpoints,
) -> Result<(), (&'static str, &'static str)> {
    let references = [
        ("intake_form", &checkpoints.intake_form),
        ("bl_release", &checkpoints.bl_release),
        ("free_zone_transfer", &checkpoints.free_zone_transfer),
        ("exit_form", &checkpoints.exit_form),
    ];

    for (field, value) in references {
        if value.as_deref().is_some_and(|v| v.chars().count() > MAX_CHECKPOINT_LEN) {
            return Err((field, "Reference must be at most 64 characters"));
        }
    }
    Ok(())
}

// ============================================================================
// Registry Validations
// ============================================================================

/// An entity must be a client, an agency, or both
pub fn validate_client_flags(is_client: bool, is_agency: bool) -> Result<(), &'static str> {
    if !is_client && !is_agency {
        return Err("Entity must be marked as client or customs agency");
    }
    Ok(())
}

/// Validate email format (basic check)
pub fn validate_email(email: &str) -> Result<(), &'static str> {
    if email.contains('@') && email.contains('.') && email.len() >= 5 {
        Ok(())
    } else {
        Err("Invalid email format")
    }
}

// ============================================================================
// Administration Validations
// ============================================================================

/// Role names: 1-64 chars of lowercase letters, digits, `_` or `-`
pub fn validate_role_name(name: &str) -> Result<(), &'static str> {
    if name.is_empty() {
        return Err("Role name is required");
    }
    if name.len() > 64 {
        return Err("Role name must be at most 64 characters");
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '_' | '-'))
    {
        return Err("Role name may only contain lowercase letters, digits, '_' and '-'");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_validate_order_code_valid() {
        assert!(validate_order_code("DO-2024-0153").is_ok());
        assert!(validate_order_code("ZF/123.4").is_ok());
    }

    #[test]
    fn test_validate_order_code_invalid() {
        assert!(validate_order_code("").is_err());
        assert!(validate_order_code("   ").is_err());
        assert!(validate_order_code("DO 2024").is_err());
        assert!(validate_order_code(&"X".repeat(33)).is_err());
    }

    #[test]
    fn test_validate_movement_quantities() {
        let weight = Decimal::from_str("250.75").unwrap();
        assert!(validate_movement_quantities(10, weight).is_ok());
        assert!(validate_movement_quantities(0, Decimal::ZERO).is_ok());
        assert!(validate_movement_quantities(-1, weight).is_err());
        assert!(validate_movement_quantities(1, -weight).is_err());
    }

    #[test]
    fn test_validate_client_flags() {
        assert!(validate_client_flags(true, false).is_ok());
        assert!(validate_client_flags(false, true).is_ok());
        assert!(validate_client_flags(true, true).is_ok());
        assert!(validate_client_flags(false, false).is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("admin@logiservices.com").is_ok());
        assert!(validate_email("invalid").is_err());
        assert!(validate_email("a@b").is_err());
    }

    #[test]
    fn test_validate_checkpoints() {
        let mut cp = OrderCheckpoints {
            intake_form: Some("FI-2024-001".to_string()),
            ..Default::default()
        };
        assert!(validate_checkpoints(&cp).is_ok());

        cp.exit_form = Some("X".repeat(65));
        assert_eq!(validate_checkpoints(&cp).unwrap_err().0, "exit_form");
    }

    #[test]
    fn test_validate_role_name() {
        assert!(validate_role_name("warehouse_clerk").is_ok());
        assert!(validate_role_name("").is_err());
        assert!(validate_role_name("Billing Team").is_err());
        assert!(validate_role_name(&"a".repeat(65)).is_err());
    }
}
