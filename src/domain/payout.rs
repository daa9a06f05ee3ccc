use serde::{Deserialize, Serialize};

/// Payout destination on file for a user. One variant per supported rail,
/// validated independently; replaces the source system's merged free-form
/// payment-info blob.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum PayoutDetails {
    BankAccount {
        account_holder_name: String,
        account_number: String,
        bank_name: String,
        ifsc_code: String,
        #[serde(default)]
        branch_name: String,
    },
    Upi {
        upi_id: String,
        upi_name: String,
    },
    Paypal {
        paypal_email: String,
        paypal_name: String,
    },
    Wallet {
        wallet_type: WalletType,
        wallet_number: String,
        wallet_name: String,
    },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WalletType {
    Phonepe,
    Googlepay,
    Paytm,
    Amazonpay,
    Other,
}

impl PayoutDetails {
    /// Whether every field needed to actually disburse on this rail is
    /// present. Read by the payment-eligibility preconditions.
    pub fn is_complete(&self) -> bool {
        match self {
            PayoutDetails::BankAccount {
                account_holder_name,
                account_number,
                bank_name,
                ifsc_code,
                ..
            } => {
                !account_holder_name.is_empty()
                    && !account_number.is_empty()
                    && !bank_name.is_empty()
                    && !ifsc_code.is_empty()
            }
            PayoutDetails::Upi { upi_id, upi_name } => {
                !upi_id.is_empty() && !upi_name.is_empty()
            }
            PayoutDetails::Paypal { paypal_email, paypal_name } => {
                !paypal_email.is_empty() && !paypal_name.is_empty()
            }
            PayoutDetails::Wallet { wallet_number, wallet_name, .. } => {
                !wallet_number.is_empty() && !wallet_name.is_empty()
            }
        }
    }

    /// Masked summary for admin screens; never exposes full account numbers.
    pub fn display_info(&self) -> PayoutDisplayInfo {
        match self {
            PayoutDetails::BankAccount { account_holder_name, account_number, bank_name, .. } => {
                PayoutDisplayInfo {
                    method: "Bank Account".to_string(),
                    display: format!("{} - ****{}", bank_name, last4(account_number)),
                    name: account_holder_name.clone(),
                }
            }
            PayoutDetails::Upi { upi_id, upi_name } => PayoutDisplayInfo {
                method: "UPI".to_string(),
                display: upi_id.clone(),
                name: upi_name.clone(),
            },
            PayoutDetails::Paypal { paypal_email, paypal_name } => PayoutDisplayInfo {
                method: "PayPal".to_string(),
                display: paypal_email.clone(),
                name: paypal_name.clone(),
            },
            PayoutDetails::Wallet { wallet_type, wallet_number, wallet_name } => {
                PayoutDisplayInfo {
                    method: format!("{:?}", wallet_type),
                    display: format!("****{}", last4(wallet_number)),
                    name: wallet_name.clone(),
                }
            }
        }
    }
}

fn last4(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let start = chars.len().saturating_sub(4);
    chars[start..].iter().collect()
}

#[derive(Debug, Clone, Serialize)]
pub struct PayoutDisplayInfo {
    pub method: String,
    pub display: String,
    pub name: String,
}
