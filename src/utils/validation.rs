//! Utilidades de validación
//!
//! Funciones helper para validación de datos de entrada
//! y conversión de tipos.

use regex::Regex;
use rust_decimal::Decimal;
use validator::ValidationError;

/// Validar que un string no esté vacío
pub fn validate_not_empty(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("not_empty");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar formato de placa de vehículo
pub fn validate_plate(value: &str) -> Result<(), ValidationError> {
    let clean_plate = value.replace([' ', '-'], "");
    if clean_plate.len() < 5 || clean_plate.len() > 10 {
        let mut error = ValidationError::new("plate");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar documento de identidad/fiscal (solo dígitos, 8 a 13)
pub fn validate_document(value: &str) -> Result<(), ValidationError> {
    let re = Regex::new(r"^\d{8,13}$").expect("regex de documento inválida");
    if !re.is_match(value.trim()) {
        let mut error = ValidationError::new("document");
        error.add_param("value".into(), &value.to_string());
        error.add_param("format".into(), &"8 a 13 dígitos".to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar formato de email
pub fn validate_email(value: &str) -> Result<(), ValidationError> {
    if !value.contains('@') || !value.contains('.') {
        let mut error = ValidationError::new("email");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar formato de teléfono (básico)
pub fn validate_phone(value: &str) -> Result<(), ValidationError> {
    let clean_phone = value.chars().filter(|c| c.is_ascii_digit()).collect::<String>();
    if clean_phone.len() < 7 || clean_phone.len() > 15 {
        let mut error = ValidationError::new("phone");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar que un monto sea no negativo
pub fn validate_non_negative(value: Decimal) -> Result<(), ValidationError> {
    if value < Decimal::ZERO {
        let mut error = ValidationError::new("non_negative");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar que una cantidad sea positiva
pub fn validate_positive(value: Decimal) -> Result<(), ValidationError> {
    if value <= Decimal::ZERO {
        let mut error = ValidationError::new("positive");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar porcentaje (0 a 100)
pub fn validate_percent(value: Decimal) -> Result<(), ValidationError> {
    if value < Decimal::ZERO || value > Decimal::from(100) {
        let mut error = ValidationError::new("percent");
        error.add_param("value".into(), &value.to_string());
        error.add_param("range".into(), &"0 a 100".to_string());
        return Err(error);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_not_empty() {
        assert!(validate_not_empty("hola").is_ok());
        assert!(validate_not_empty("   ").is_err());
    }

    #[test]
    fn test_validate_plate() {
        assert!(validate_plate("ABC-123").is_ok());
        assert!(validate_plate("A-1").is_err());
        assert!(validate_plate("ABCDEFGHIJK").is_err());
    }

    #[test]
    fn test_validate_document() {
        assert!(validate_document("12345678").is_ok());
        assert!(validate_document("1234567890123").is_ok());
        assert!(validate_document("1234").is_err());
        assert!(validate_document("12A45678").is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("test@example.com").is_ok());
        assert!(validate_email("invalido").is_err());
    }

    #[test]
    fn test_validate_phone() {
        assert!(validate_phone("987654321").is_ok());
        assert!(validate_phone("123").is_err());
    }

    #[test]
    fn test_validate_percent() {
        assert!(validate_percent(Decimal::from(18)).is_ok());
        assert!(validate_percent(Decimal::from(101)).is_err());
        assert!(validate_percent(Decimal::from(-1)).is_err());
    }
}
