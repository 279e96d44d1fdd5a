use std::collections::BTreeMap;

pub const TEXT_FIELD: &str = "text";

/// Optional structured fields the dashboard form may carry next to `text`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum FormField {
    JobTitle,
    SalaryRange,
    CompanyProfile,
    Requirements,
}

impl FormField {
    pub fn name(self) -> &'static str {
        match self {
            FormField::JobTitle => "job_title",
            FormField::SalaryRange => "salary_range",
            FormField::CompanyProfile => "company_profile",
            FormField::Requirements => "requirements",
        }
    }
}

/// Encoded form body, in field order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormPayload {
    fields: Vec<(String, String)>,
}

impl FormPayload {
    pub fn fields(&self) -> &[(String, String)] {
        &self.fields
    }

    pub fn into_fields(self) -> Vec<(String, String)> {
        self.fields
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(crate) struct FormState {
    text: String,
    extra: BTreeMap<FormField, String>,
}

impl FormState {
    pub(crate) fn set_text(&mut self, text: String) {
        self.text = text;
    }

    pub(crate) fn set_field(&mut self, field: FormField, value: String) {
        if value.trim().is_empty() {
            self.extra.remove(&field);
        } else {
            self.extra.insert(field, value);
        }
    }

    pub(crate) fn text(&self) -> &str {
        &self.text
    }

    /// Serializes the form as it stands. `text` is sent as typed; the server
    /// trims it again.
    pub(crate) fn payload(&self) -> FormPayload {
        let mut fields = Vec::with_capacity(1 + self.extra.len());
        fields.push((TEXT_FIELD.to_string(), self.text.clone()));
        fields.extend(
            self.extra
                .iter()
                .map(|(field, value)| (field.name().to_string(), value.clone())),
        );
        FormPayload { fields }
    }
}
