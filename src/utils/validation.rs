//! Utilidades de validación
//!
//! Validadores custom usados por los DTOs del inventario.

use validator::ValidationError;

/// Validar que un string no esté vacío ni sea solo espacios
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("not_blank");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar formato de teléfono (básico): entre 10 y 13 dígitos
pub fn validate_phone(value: &str) -> Result<(), ValidationError> {
    let digits = value.chars().filter(|c| c.is_ascii_digit()).count();
    if !(10..=13).contains(&digits) {
        let mut error = ValidationError::new("phone");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Las imágenes deben ser URLs http(s)
pub fn validate_image_urls(urls: &[String]) -> Result<(), ValidationError> {
    if let Some(invalid) = urls
        .iter()
        .find(|url| !(url.starts_with("http://") || url.starts_with("https://")))
    {
        let mut error = ValidationError::new("image_url");
        error.add_param("value".into(), invalid);
        return Err(error);
    }
    Ok(())
}
