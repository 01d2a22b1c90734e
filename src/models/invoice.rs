use serde::{Deserialize, Serialize};

/// A payment request presented to the user as a scannable code.
///
/// `final_amount`, `unique_code` and `payload` are an immutable snapshot
/// taken at creation time. The payload is never rebuilt afterward: a code
/// already shown to the payer has to stay exactly what they scanned, even if
/// the configured base payload changes later.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invoice {
    pub id: i64,
    pub user_id: i64,
    pub plan_name: String,
    /// Requested price in whole currency units.
    pub base_amount: i64,
    /// Random 3-digit surcharge that disambiguates concurrent payments.
    pub unique_code: i64,
    /// `base_amount + unique_code`; the amount the payer actually transfers.
    pub final_amount: i64,
    /// Full built QRIS payload, checksum included.
    pub payload: String,
    pub status: InvoiceStatus,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Data required to create a new invoice.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateInvoice {
    pub user_id: i64,
    pub plan_name: String,
    pub base_amount: i64,
    pub unique_code: i64,
    pub final_amount: i64,
    pub payload: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    Pending,
    Paid,
    /// Terminal state reserved for an external expiry sweep; nothing in the
    /// service itself drives a pending invoice here.
    Expired,
}

impl InvoiceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
            Self::Expired => "expired",
        }
    }
}

impl std::str::FromStr for InvoiceStatus {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "paid" => Ok(Self::Paid),
            "expired" => Ok(Self::Expired),
            _ => Err(()),
        }
    }
}

impl std::fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
