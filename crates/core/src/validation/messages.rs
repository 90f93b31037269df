//! Localized validation messages.
//!
//! Violations carry a code plus parameters; this module turns them into text
//! for one [`Locale`]. The locale is always an argument, there is no process
//! wide formatter.

use std::fmt;

use serde_json::Value;

use super::Violation;

/// Languages the message catalog covers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Locale {
    #[default]
    PtBr,
    En,
}

impl Locale {
    /// Parse a BCP 47 tag such as `pt-BR`, `pt` or `en-US`.
    pub fn from_tag(tag: &str) -> Option<Locale> {
        let primary = tag.trim().split(['-', '_']).next()?.to_ascii_lowercase();
        match primary.as_str() {
            "pt" => Some(Locale::PtBr),
            "en" => Some(Locale::En),
            _ => None,
        }
    }

    /// Pick the first supported language of an `Accept-Language` header.
    ///
    /// Entries are taken in the order given; quality values are ignored.
    pub fn from_accept_language(header: &str) -> Option<Locale> {
        header
            .split(',')
            .filter_map(|entry| entry.split(';').next())
            .find_map(Locale::from_tag)
    }

    pub fn tag(self) -> &'static str {
        match self {
            Locale::PtBr => "pt-BR",
            Locale::En => "en",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Render a single violation.
pub fn render(locale: Locale, violation: &Violation) -> String {
    let params = &violation.params;
    let key = match violation.code.as_str() {
        "length" => bounded_key(params, "length_between", "length_min", "length_max"),
        "range" => bounded_key(params, "range_between", "range_min", "range_max"),
        other => other,
    };
    interpolate(template(locale, key), params)
}

/// Message for a body that could not be decoded into the schema's shape.
pub fn invalid_body(locale: Locale, detail: &str) -> String {
    template(locale, "invalid_body").replace("{detail}", detail)
}

fn bounded_key<'a>(
    params: &std::collections::BTreeMap<String, Value>,
    between: &'a str,
    min_only: &'a str,
    max_only: &'a str,
) -> &'a str {
    match (params.contains_key("min"), params.contains_key("max")) {
        (true, true) => between,
        (true, false) => min_only,
        (false, true) => max_only,
        (false, false) => "invalid",
    }
}

fn interpolate(template: &str, params: &std::collections::BTreeMap<String, Value>) -> String {
    params.iter().fold(template.to_string(), |text, (name, value)| {
        text.replace(&format!("{{{name}}}"), &display_param(value))
    })
}

fn display_param(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => match n.as_f64() {
            Some(f) if n.is_f64() && f.fract() == 0.0 => format!("{f:.0}"),
            _ => n.to_string(),
        },
        other => other.to_string(),
    }
}

fn template(locale: Locale, key: &str) -> &'static str {
    match locale {
        Locale::PtBr => pt_br(key),
        Locale::En => en(key),
    }
}

fn pt_br(key: &str) -> &'static str {
    match key {
        "required" => "Campo obrigatório",
        "required_for_publish" => "Campo obrigatório para publicar",
        "required_for_schedule" => "Campo obrigatório para agendar",
        "length_between" => "Deve ter entre {min} e {max} caracteres",
        "length_min" => "Deve ter pelo menos {min} caracteres",
        "length_max" => "Deve ter no máximo {max} caracteres",
        "max_items" => "Máximo de {max} itens",
        "item_length" => "Cada item deve ter no máximo {max} caracteres",
        "range_between" => "Deve estar entre {min} e {max}",
        "range_min" => "Deve ser maior ou igual a {min}",
        "range_max" => "Deve ser menor ou igual a {max}",
        "slug_format" => "Use apenas letras minúsculas, números e hífens",
        "slug_underivable" => "Não foi possível gerar um slug a partir do título; informe um slug",
        "http_url" => "Informe uma URL válida começando com http:// ou https://",
        "email" => "E-mail inválido",
        "invalid_option" => "Opção inválida",
        "quarter_hour" => "O horário deve estar em intervalos de 15 minutos",
        "end_too_soon" => "O término deve ser pelo menos {minutes} minutos após o início",
        "end_before_start" => "A data de término deve ser posterior à data de início",
        "price_order" => "O preço máximo deve ser maior ou igual ao preço mínimo",
        "cover_alt_required" => "Descreva a imagem de capa (texto alternativo)",
        "image_alt_required" => "Descreva a imagem (texto alternativo)",
        "currency_format" => "Use um código de moeda com 3 letras maiúsculas, ex.: BRL",
        "archive_via_delete" => "Para arquivar, exclua o item",
        "instagram_format" => "Usuário do Instagram inválido",
        "phone_format" => "Telefone inválido",
        "timestamp_format" => "Data e hora inválidas",
        "invalid_body" => "Formato de dados inválido: {detail}",
        _ => "Valor inválido",
    }
}

fn en(key: &str) -> &'static str {
    match key {
        "required" => "This field is required",
        "required_for_publish" => "Required before publishing",
        "required_for_schedule" => "Required before scheduling",
        "length_between" => "Must be between {min} and {max} characters",
        "length_min" => "Must be at least {min} characters",
        "length_max" => "Must be at most {max} characters",
        "max_items" => "At most {max} items",
        "item_length" => "Each item must be at most {max} characters",
        "range_between" => "Must be between {min} and {max}",
        "range_min" => "Must be greater than or equal to {min}",
        "range_max" => "Must be less than or equal to {max}",
        "slug_format" => "Use only lowercase letters, digits and hyphens",
        "slug_underivable" => "Could not derive a slug from the title; provide one",
        "http_url" => "Enter a valid URL starting with http:// or https://",
        "email" => "Invalid email address",
        "invalid_option" => "Invalid option",
        "quarter_hour" => "Time must be on a 15-minute boundary",
        "end_too_soon" => "End must be at least {minutes} minutes after start",
        "end_before_start" => "End date must be after start date",
        "price_order" => "Maximum price must be greater than or equal to minimum price",
        "cover_alt_required" => "Describe the cover image (alt text)",
        "image_alt_required" => "Describe the image (alt text)",
        "currency_format" => "Use a 3-letter uppercase currency code, e.g. BRL",
        "archive_via_delete" => "Delete the item to archive it",
        "instagram_format" => "Invalid Instagram handle",
        "phone_format" => "Invalid phone number",
        "timestamp_format" => "Invalid date and time",
        "invalid_body" => "Malformed payload: {detail}",
        _ => "Invalid value",
    }
}
