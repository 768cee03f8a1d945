/// Masks sensitive values (credentials, patient identifiers) for logs.
pub fn mask_sensitive(value: &str) -> String {
    if value.is_empty() {
        return "".to_string();
    }

    let len = value.len();
    if len <= 4 {
        return "*".repeat(len);
    }

    // Keep the first two and last two characters.
    format!(
        "{}{}{}",
        &value[..2],
        "*".repeat(len - 4),
        &value[len - 2..]
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn masks_middle_of_value() {
        assert_eq!(mask_sensitive("MyPassword123"), "My*********23");
        assert_eq!(mask_sensitive("784199012345671"), "78***********71");
        assert_eq!(mask_sensitive("abc"), "***");
        assert_eq!(mask_sensitive(""), "");
    }
}
