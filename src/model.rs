use serde::{Deserialize, Serialize};

/// A row of the bank operations export. Fields map to the export's column
/// headers so records serialize back in the source format. Date fields
/// stay strings; reports parse them on demand and echo the original text
/// in their output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(rename = "Дата операции")]
    pub operation_date: String,
    #[serde(rename = "Дата платежа")]
    pub payment_date: String,
    /// Absent for account operations such as incoming transfers.
    #[serde(rename = "Номер карты")]
    pub card: Option<String>,
    #[serde(rename = "Статус")]
    pub status: Status,
    #[serde(rename = "Сумма операции")]
    pub operation_amount: f64,
    #[serde(rename = "Валюта операции")]
    pub operation_currency: String,
    /// Signed; negative is a debit.
    #[serde(rename = "Сумма платежа")]
    pub payment_amount: f64,
    #[serde(rename = "Валюта платежа")]
    pub payment_currency: String,
    #[serde(rename = "Кэшбэк")]
    pub cashback: Option<f64>,
    #[serde(rename = "Категория")]
    pub category: String,
    #[serde(rename = "MCC")]
    pub mcc: Option<u32>,
    #[serde(rename = "Описание")]
    pub description: String,
}

impl Transaction {
    /// Cashback is blank for most rows; blank counts as zero.
    pub fn cashback_amount(&self) -> f64 {
        self.cashback.unwrap_or(0.0)
    }
}

/// Operation status. Anything but OK is preserved verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Status {
    Ok,
    Other(String),
}

impl From<String> for Status {
    fn from(raw: String) -> Self {
        if raw == "OK" {
            Status::Ok
        } else {
            Status::Other(raw)
        }
    }
}

impl From<Status> for String {
    fn from(status: Status) -> Self {
        match status {
            Status::Ok => "OK".to_string(),
            Status::Other(raw) => raw,
        }
    }
}
