//! Form validation for registration, profile, password and product forms.
//!
//! Validation here only saves round trips; the API re-validates everything.
//! Messages are the Spanish strings shown next to each field.

use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::models::{NewUser, Product, ProductDraft, ProfileUpdate};
use crate::types::{Email, Money};

static PERSON_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-ZáéíóúÁÉÍÓÚñÑ\s]+$").expect("Invalid regex"));
static DNI_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{7,8}$").expect("Invalid regex"));
static USERNAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_]+$").expect("Invalid regex"));
static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{10,15}$").expect("Invalid regex"));
static POSTAL_CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{4,8}$").expect("Invalid regex"));

const REQUIRED: &str = "Este campo es requerido";

/// Image extensions accepted for product pictures.
pub const IMAGE_EXTENSIONS: [&str; 5] = [".jpg", ".jpeg", ".png", ".gif", ".webp"];

/// A rejected form field.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("{message}")]
pub struct FieldError {
    /// Form input name the message belongs to.
    pub field: &'static str,
    pub message: &'static str,
}

impl FieldError {
    const fn new(field: &'static str, message: &'static str) -> Self {
        Self { field, message }
    }
}

/// All field errors of one submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors(Vec<FieldError>);

impl FormErrors {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Message for `field`, if it failed.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&'static str> {
        self.0.iter().find(|e| e.field == field).map(|e| e.message)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    fn check(&mut self, field: &'static str, result: Result<(), &'static str>) {
        if let Err(message) = result {
            self.0.push(FieldError::new(field, message));
        }
    }
}

fn person_name(value: &str) -> Result<(), &'static str> {
    if value.trim().is_empty() {
        return Err(REQUIRED);
    }
    if value.chars().count() < 2 {
        return Err("Mínimo 2 caracteres");
    }
    if !PERSON_NAME_RE.is_match(value) {
        return Err("Solo se permiten letras");
    }
    Ok(())
}

fn pattern(value: &str, re: &Regex, message: &'static str) -> Result<(), &'static str> {
    if value.trim().is_empty() {
        return Err(REQUIRED);
    }
    if !re.is_match(value) {
        return Err(message);
    }
    Ok(())
}

fn email(value: &str) -> Result<(), &'static str> {
    if value.trim().is_empty() {
        return Err(REQUIRED);
    }
    Email::parse(value).map(|_| ()).map_err(|_| "Email inválido")
}

fn username(value: &str) -> Result<(), &'static str> {
    if value.trim().is_empty() {
        return Err(REQUIRED);
    }
    if value.chars().count() < 3 {
        return Err("Mínimo 3 caracteres");
    }
    if !USERNAME_RE.is_match(value) {
        return Err("Solo letras, números y _");
    }
    Ok(())
}

/// At least six characters with a lowercase letter, an uppercase letter and
/// a digit.
///
/// # Errors
///
/// Returns the message for the first unmet rule.
pub fn password_strength(value: &str) -> Result<(), &'static str> {
    if value.trim().is_empty() {
        return Err(REQUIRED);
    }
    if value.chars().count() < 6 {
        return Err("Mínimo 6 caracteres");
    }
    let lower = value.chars().any(|c| c.is_ascii_lowercase());
    let upper = value.chars().any(|c| c.is_ascii_uppercase());
    let digit = value.chars().any(|c| c.is_ascii_digit());
    if !(lower && upper && digit) {
        return Err("Debe contener mayúsculas, minúsculas y números");
    }
    Ok(())
}

fn min_length(value: &str, min: usize, message: &'static str) -> Result<(), &'static str> {
    if value.trim().is_empty() {
        return Err(REQUIRED);
    }
    if value.chars().count() < min {
        return Err(message);
    }
    Ok(())
}

fn required(value: &str) -> Result<(), &'static str> {
    if value.trim().is_empty() {
        Err(REQUIRED)
    } else {
        Ok(())
    }
}

/// The registration form as posted by the browser.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegistrationForm {
    #[serde(rename = "nombre", default)]
    pub first_name: String,
    #[serde(rename = "apellido", default)]
    pub last_name: String,
    #[serde(default)]
    pub dni: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(rename = "confirmar_password", default)]
    pub password_confirmation: String,
    #[serde(rename = "telefono", default)]
    pub phone: String,
    #[serde(rename = "direccion", default)]
    pub address: String,
    #[serde(rename = "ciudad", default)]
    pub city: String,
    #[serde(rename = "codigo_postal", default)]
    pub postal_code: String,
}

impl RegistrationForm {
    /// Check every field and build the API body when all pass.
    ///
    /// # Errors
    ///
    /// Returns one message per failing field, keyed by input name.
    pub fn validate(&self) -> Result<NewUser, FormErrors> {
        let mut errors = FormErrors::default();
        errors.check("nombre", person_name(&self.first_name));
        errors.check("apellido", person_name(&self.last_name));
        errors.check("dni", pattern(&self.dni, &DNI_RE, "DNI debe tener 7 u 8 dígitos"));
        errors.check("email", email(&self.email));
        errors.check("username", username(&self.username));
        errors.check("password", password_strength(&self.password));
        if self.password_confirmation != self.password {
            errors.check("confirmar_password", Err("Las contraseñas no coinciden"));
        }
        errors.check("telefono", pattern(&self.phone, &PHONE_RE, "Teléfono inválido"));
        errors.check(
            "direccion",
            min_length(&self.address, 5, "Dirección demasiado corta"),
        );
        errors.check("ciudad", required(&self.city));
        errors.check(
            "codigo_postal",
            pattern(&self.postal_code, &POSTAL_CODE_RE, "Código postal inválido"),
        );

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(NewUser {
            first_name: self.first_name.trim().to_owned(),
            last_name: self.last_name.trim().to_owned(),
            dni: self.dni.clone(),
            email: self.email.trim().to_owned(),
            username: self.username.clone(),
            password: self.password.clone(),
            phone: self.phone.clone(),
            address: self.address.trim().to_owned(),
            city: self.city.trim().to_owned(),
            postal_code: self.postal_code.clone(),
        })
    }
}

/// The settings page profile form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileForm {
    #[serde(rename = "nombre", default)]
    pub first_name: String,
    #[serde(rename = "apellido", default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub username: String,
    #[serde(rename = "telefono", default)]
    pub phone: String,
    #[serde(rename = "direccion", default)]
    pub address: String,
    #[serde(rename = "ciudad", default)]
    pub city: String,
    #[serde(rename = "codigo_postal", default)]
    pub postal_code: String,
}

impl ProfileForm {
    /// Blank fields are left out of the update; a present email must be valid.
    ///
    /// # Errors
    ///
    /// Returns a field error when the email is malformed.
    pub fn into_update(self) -> Result<ProfileUpdate, FieldError> {
        fn present(value: String) -> Option<String> {
            let trimmed = value.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_owned())
        }

        let email_value = present(self.email);
        if let Some(value) = &email_value {
            if Email::parse(value).is_err() {
                return Err(FieldError::new("email", "Email inválido"));
            }
        }

        Ok(ProfileUpdate {
            first_name: present(self.first_name),
            last_name: present(self.last_name),
            email: email_value,
            username: present(self.username),
            phone: present(self.phone),
            address: present(self.address),
            city: present(self.city),
            postal_code: present(self.postal_code),
            password: None,
        })
    }
}

/// The settings page password form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PasswordChangeForm {
    #[serde(default)]
    pub current_password: String,
    #[serde(default)]
    pub new_password: String,
    #[serde(default)]
    pub confirm_password: String,
}

impl PasswordChangeForm {
    /// New and confirmation must match and satisfy the registration rule.
    ///
    /// # Errors
    ///
    /// Returns the first failing rule.
    pub fn validate(&self) -> Result<ProfileUpdate, FieldError> {
        if self.new_password != self.confirm_password {
            return Err(FieldError::new(
                "confirm_password",
                "Las nuevas contraseñas no coinciden.",
            ));
        }
        password_strength(&self.new_password)
            .map_err(|message| FieldError::new("new_password", message))?;
        Ok(ProfileUpdate {
            password: Some(self.new_password.clone()),
            ..ProfileUpdate::default()
        })
    }
}

/// The admin product form. Numbers arrive as text so that bad input can be
/// reported instead of rejected by the extractor.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductForm {
    #[serde(rename = "nombre", default)]
    pub name: String,
    #[serde(rename = "descripcion", default)]
    pub description: String,
    #[serde(rename = "precio", default)]
    pub price: String,
    #[serde(default)]
    pub stock: String,
    #[serde(rename = "categoria", default)]
    pub category: String,
    #[serde(rename = "imagen_url", default)]
    pub image_url: String,
}

impl ProductForm {
    /// Validate in field order and build the API body.
    ///
    /// # Errors
    ///
    /// Returns the first failing rule.
    pub fn validate(&self) -> Result<ProductDraft, FieldError> {
        let name = self.name.trim();
        let name_len = name.chars().count();
        if !(2..=100).contains(&name_len) {
            return Err(FieldError::new(
                "nombre",
                "Nombre debe tener entre 2 y 100 caracteres",
            ));
        }

        let description = self.description.trim();
        let description_len = description.chars().count();
        if !(10..=500).contains(&description_len) {
            return Err(FieldError::new(
                "descripcion",
                "Descripción debe tener entre 10 y 500 caracteres",
            ));
        }

        let price = Decimal::from_str(self.price.trim().replace(',', ".").as_str())
            .ok()
            .filter(|p| !p.is_sign_negative())
            .ok_or(FieldError::new("precio", "Precio debe ser un número positivo"))?;

        let stock_text = self.stock.trim();
        let stock = if stock_text.is_empty() {
            0
        } else {
            stock_text
                .parse::<i32>()
                .ok()
                .filter(|s| *s >= 0)
                .ok_or(FieldError::new(
                    "stock",
                    "Stock debe ser un número entero positivo",
                ))?
        };

        let category = self.category.trim();
        let category_len = category.chars().count();
        if !(2..=50).contains(&category_len) {
            return Err(FieldError::new(
                "categoria",
                "Categoría debe tener entre 2 y 50 caracteres",
            ));
        }

        let image_url = self.image_url.trim();
        let image_url = if image_url.is_empty() {
            None
        } else {
            validate_image_url(image_url)?;
            Some(image_url.to_owned())
        };

        Ok(ProductDraft {
            name: name.to_owned(),
            description: description.to_owned(),
            price: Money::new(price),
            stock,
            category: category.to_owned(),
            image_url,
        })
    }
}

impl From<&Product> for ProductForm {
    /// Prefill the edit form from a stored product.
    fn from(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.price.round_cents().amount().to_string(),
            stock: product.stock.to_string(),
            category: product.category.clone(),
            image_url: product.image_url.clone().unwrap_or_default(),
        }
    }
}

/// An absolute URL whose path ends in one of [`IMAGE_EXTENSIONS`].
///
/// # Errors
///
/// Returns a field error when the URL does not parse or is not an image.
pub fn validate_image_url(raw: &str) -> Result<(), FieldError> {
    let url = url::Url::parse(raw)
        .map_err(|_| FieldError::new("imagen_url", "Debe ser una URL válida"))?;
    let path = url.path().to_lowercase();
    if IMAGE_EXTENSIONS.iter().any(|ext| path.ends_with(ext)) {
        Ok(())
    } else {
        Err(FieldError::new(
            "imagen_url",
            "La imagen debe ser JPG, JPEG, PNG, GIF o WEBP",
        ))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn valid_registration() -> RegistrationForm {
        RegistrationForm {
            first_name: "María José".to_owned(),
            last_name: "Núñez".to_owned(),
            dni: "30123456".to_owned(),
            email: "maria@correo.com.ar".to_owned(),
            username: "maria_n".to_owned(),
            password: "Clave123".to_owned(),
            password_confirmation: "Clave123".to_owned(),
            phone: "3511234567".to_owned(),
            address: "Av. Colón 1200".to_owned(),
            city: "Córdoba".to_owned(),
            postal_code: "5000".to_owned(),
        }
    }

    #[test]
    fn test_valid_registration_builds_body() {
        let user = valid_registration().validate().unwrap();
        assert_eq!(user.first_name, "María José");
        assert_eq!(user.password, "Clave123");
    }

    #[test]
    fn test_six_digit_dni_rejected() {
        let mut form = valid_registration();
        form.dni = "123456".to_owned();
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.get("dni"), Some("DNI debe tener 7 u 8 dígitos"));
        assert_eq!(errors.iter().count(), 1);
    }

    #[test]
    fn test_non_ascii_digits_rejected() {
        let mut form = valid_registration();
        form.dni = "١٢٣٤٥٦٧".to_owned();
        form.phone = "٣٥١١٢٣٤٥٦٧".to_owned();
        form.postal_code = "٥٠٠٠".to_owned();
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.get("dni"), Some("DNI debe tener 7 u 8 dígitos"));
        assert_eq!(errors.get("telefono"), Some("Teléfono inválido"));
        assert_eq!(errors.get("codigo_postal"), Some("Código postal inválido"));
        assert_eq!(errors.iter().count(), 3);
    }

    #[test]
    fn test_password_without_uppercase_rejected() {
        let mut form = valid_registration();
        form.password = "clave123".to_owned();
        form.password_confirmation = "clave123".to_owned();
        let errors = form.validate().unwrap_err();
        assert_eq!(
            errors.get("password"),
            Some("Debe contener mayúsculas, minúsculas y números")
        );
    }

    #[test]
    fn test_mismatched_confirmation_rejected() {
        let mut form = valid_registration();
        form.password_confirmation = "Clave124".to_owned();
        let errors = form.validate().unwrap_err();
        assert_eq!(
            errors.get("confirmar_password"),
            Some("Las contraseñas no coinciden")
        );
        assert!(errors.get("password").is_none());
    }

    #[test]
    fn test_each_field_rule() {
        let cases: [(fn(&mut RegistrationForm), &str, &str); 9] = [
            (|f| f.first_name = "J".to_owned(), "nombre", "Mínimo 2 caracteres"),
            (|f| f.last_name = "Pérez2".to_owned(), "apellido", "Solo se permiten letras"),
            (|f| f.email = "maria@correo".to_owned(), "email", "Email inválido"),
            (|f| f.username = "ma".to_owned(), "username", "Mínimo 3 caracteres"),
            (|f| f.username = "maria-n".to_owned(), "username", "Solo letras, números y _"),
            (|f| f.phone = "351-123".to_owned(), "telefono", "Teléfono inválido"),
            (|f| f.address = "Av 1".to_owned(), "direccion", "Dirección demasiado corta"),
            (|f| f.city = " ".to_owned(), "ciudad", REQUIRED),
            (|f| f.postal_code = "50".to_owned(), "codigo_postal", "Código postal inválido"),
        ];
        for (mutate, field, message) in cases {
            let mut form = valid_registration();
            mutate(&mut form);
            let errors = form.validate().unwrap_err();
            assert_eq!(errors.get(field), Some(message), "field {field}");
        }
    }

    #[test]
    fn test_empty_form_reports_required_everywhere() {
        let errors = RegistrationForm::default().validate().unwrap_err();
        for field in ["nombre", "apellido", "dni", "email", "username", "password"] {
            assert_eq!(errors.get(field), Some(REQUIRED), "field {field}");
        }
    }

    fn valid_product() -> ProductForm {
        ProductForm {
            name: "Disyuntor 2x40A".to_owned(),
            description: "Disyuntor diferencial bipolar 30mA".to_owned(),
            price: "18500,50".to_owned(),
            stock: String::new(),
            category: "Interruptores".to_owned(),
            image_url: "https://cdn.jfa.com.ar/img/disyuntor.webp".to_owned(),
        }
    }

    #[test]
    fn test_product_form_valid() {
        let draft = valid_product().validate().unwrap();
        assert_eq!(draft.stock, 0);
        assert_eq!(draft.price.plain(), "18500,50");
        assert!(draft.image_url.is_some());
    }

    #[test]
    fn test_edit_form_prefill_validates_again() {
        let draft = valid_product().validate().unwrap();
        let product = Product {
            id: crate::types::ProductId::new(9),
            name: draft.name.clone(),
            description: draft.description.clone(),
            price: draft.price,
            stock: 4,
            category: draft.category.clone(),
            image_url: draft.image_url.clone(),
            created_at: None,
            updated_at: None,
        };
        let form = ProductForm::from(&product);
        assert_eq!(form.price, "18500.50");
        assert_eq!(form.stock, "4");
        assert_eq!(form.validate().unwrap().stock, 4);
    }

    #[test]
    fn test_product_form_rules() {
        let mut form = valid_product();
        form.description = "corta".to_owned();
        assert_eq!(form.validate().unwrap_err().field, "descripcion");

        let mut form = valid_product();
        form.price = "-1".to_owned();
        assert_eq!(form.validate().unwrap_err().field, "precio");

        let mut form = valid_product();
        form.price = String::new();
        assert_eq!(form.validate().unwrap_err().field, "precio");

        let mut form = valid_product();
        form.stock = "2.5".to_owned();
        assert_eq!(form.validate().unwrap_err().field, "stock");

        let mut form = valid_product();
        form.category = "X".to_owned();
        assert_eq!(form.validate().unwrap_err().field, "categoria");
    }

    #[test]
    fn test_image_url_rules() {
        assert!(validate_image_url("https://x.com/a.PNG").is_ok());
        assert_eq!(
            validate_image_url("no es url").unwrap_err().message,
            "Debe ser una URL válida"
        );
        assert_eq!(
            validate_image_url("https://x.com/a.bmp").unwrap_err().message,
            "La imagen debe ser JPG, JPEG, PNG, GIF o WEBP"
        );
    }

    #[test]
    fn test_password_change() {
        let form = PasswordChangeForm {
            current_password: "Vieja123".to_owned(),
            new_password: "Nueva123".to_owned(),
            confirm_password: "Nueva124".to_owned(),
        };
        assert_eq!(form.validate().unwrap_err().field, "confirm_password");

        let form = PasswordChangeForm {
            confirm_password: "Nueva123".to_owned(),
            ..form
        };
        assert_eq!(form.validate().unwrap().password.as_deref(), Some("Nueva123"));
    }

    #[test]
    fn test_profile_form_skips_blank_fields() {
        let form = ProfileForm {
            first_name: " Ana ".to_owned(),
            city: "  ".to_owned(),
            ..ProfileForm::default()
        };
        let update = form.into_update().unwrap();
        assert_eq!(update.first_name.as_deref(), Some("Ana"));
        assert!(update.city.is_none());

        let bad = ProfileForm {
            email: "ana@".to_owned(),
            ..ProfileForm::default()
        };
        assert_eq!(bad.into_update().unwrap_err().field, "email");
    }
}
