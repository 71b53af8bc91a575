// src/common/i18n.rs

use std::collections::HashMap;

// Idioma padrão da loja (Honduras)
pub const DEFAULT_LANG: &str = "es";

const ES: &[(&str, &str)] = &[
    ("validation", "Uno o más campos son inválidos."),
    ("invalid_input", "Datos inválidos: {0}"),
    ("product_not_found", "Producto {0} no encontrado."),
    ("barcode_not_found", "Producto con código {0} no encontrado."),
    ("sale_not_found", "Factura {0} no encontrada."),
    ("alert_not_found", "Alerta {0} no encontrada."),
    ("user_not_found", "Usuario no encontrado."),
    ("expense_not_found", "Gasto {0} no encontrado."),
    ("customer_not_found", "Cliente {0} no encontrado."),
    ("barcode_exists", "El código de barras {0} ya está en uso."),
    ("username_exists", "El usuario {0} ya existe."),
    ("no_open_drawer", "No hay caja abierta."),
    ("product_has_sales", "No se puede eliminar un producto con ventas registradas."),
    ("invalid_credentials", "Usuario o contraseña incorrectos."),
    ("invalid_token", "Token de autenticación inválido o ausente."),
    ("missing_permission", "Necesita el permiso '{0}' para realizar esta acción."),
    ("invoice_failed", "La venta {0} fue registrada pero la factura no pudo generarse."),
    ("internal", "Ocurrió un error inesperado."),
];

const EN: &[(&str, &str)] = &[
    ("validation", "One or more fields are invalid."),
    ("invalid_input", "Invalid data: {0}"),
    ("product_not_found", "Product {0} not found."),
    ("barcode_not_found", "No product with barcode {0}."),
    ("sale_not_found", "Invoice {0} not found."),
    ("alert_not_found", "Alert {0} not found."),
    ("user_not_found", "User not found."),
    ("expense_not_found", "Expense {0} not found."),
    ("customer_not_found", "Customer {0} not found."),
    ("barcode_exists", "Barcode {0} is already in use."),
    ("username_exists", "Username {0} already exists."),
    ("no_open_drawer", "There is no open cash drawer."),
    ("product_has_sales", "A product with recorded sales cannot be deleted."),
    ("invalid_credentials", "Invalid username or password."),
    ("invalid_token", "Missing or invalid authentication token."),
    ("missing_permission", "You need the '{0}' permission to perform this action."),
    ("invoice_failed", "Sale {0} was recorded but its invoice could not be generated."),
    ("internal", "An unexpected error occurred."),
];

/// Catálogo de mensagens por idioma, carregado uma vez no AppState.
#[derive(Debug, Clone)]
pub struct I18nStore {
    catalogs: HashMap<&'static str, HashMap<&'static str, &'static str>>,
}

impl Default for I18nStore {
    fn default() -> Self {
        Self::new()
    }
}

impl I18nStore {
    pub fn new() -> Self {
        let mut catalogs = HashMap::new();
        catalogs.insert("es", ES.iter().copied().collect());
        catalogs.insert("en", EN.iter().copied().collect());
        Self { catalogs }
    }

    /// Traduz a chave para o idioma pedido, caindo para o espanhol.
    pub fn translate(&self, lang: &str, key: &str, arg: Option<&str>) -> String {
        let template = self
            .catalogs
            .get(lang)
            .and_then(|c| c.get(key))
            .or_else(|| self.catalogs.get(DEFAULT_LANG).and_then(|c| c.get(key)))
            .copied()
            .unwrap_or(key);

        match arg {
            Some(value) => template.replace("{0}", value),
            None => template.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn falls_back_to_spanish() {
        let store = I18nStore::new();
        assert_eq!(store.translate("fr", "no_open_drawer", None), "No hay caja abierta.");
        assert_eq!(
            store.translate("en", "product_not_found", Some("7")),
            "Product 7 not found."
        );
    }

    #[test]
    fn catalogs_have_the_same_keys() {
        let store = I18nStore::new();
        let es = &store.catalogs["es"];
        let en = &store.catalogs["en"];
        assert_eq!(es.len(), en.len());
        assert!(es.keys().all(|k| en.contains_key(k)));
    }
}
