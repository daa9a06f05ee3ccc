use chrono::Utc;
use uuid::Uuid;

use dailyreel::api::handlers::users::ProfileDto;
use dailyreel::domain::{PayoutDetails, User, UserRole, WalletType};

#[test]
fn bank_account_requires_all_core_fields() {
    let complete = PayoutDetails::BankAccount {
        account_holder_name: "Alice Kumar".to_string(),
        account_number: "123456789012".to_string(),
        bank_name: "State Bank".to_string(),
        ifsc_code: "SBIN0001234".to_string(),
        branch_name: String::new(),
    };
    assert!(complete.is_complete());

    let missing_ifsc = PayoutDetails::BankAccount {
        account_holder_name: "Alice Kumar".to_string(),
        account_number: "123456789012".to_string(),
        bank_name: "State Bank".to_string(),
        ifsc_code: String::new(),
        branch_name: String::new(),
    };
    assert!(!missing_ifsc.is_complete());
}

#[test]
fn upi_requires_id_and_name() {
    let complete = PayoutDetails::Upi {
        upi_id: "alice@upi".to_string(),
        upi_name: "Alice".to_string(),
    };
    assert!(complete.is_complete());

    let missing_name = PayoutDetails::Upi {
        upi_id: "alice@upi".to_string(),
        upi_name: String::new(),
    };
    assert!(!missing_name.is_complete());
}

#[test]
fn wallet_requires_number_and_name() {
    let complete = PayoutDetails::Wallet {
        wallet_type: WalletType::Paytm,
        wallet_number: "9876543210".to_string(),
        wallet_name: "Alice".to_string(),
    };
    assert!(complete.is_complete());

    let missing_number = PayoutDetails::Wallet {
        wallet_type: WalletType::Paytm,
        wallet_number: String::new(),
        wallet_name: "Alice".to_string(),
    };
    assert!(!missing_number.is_complete());
}

#[test]
fn display_info_masks_account_numbers() {
    let bank = PayoutDetails::BankAccount {
        account_holder_name: "Alice Kumar".to_string(),
        account_number: "123456789012".to_string(),
        bank_name: "State Bank".to_string(),
        ifsc_code: "SBIN0001234".to_string(),
        branch_name: String::new(),
    };

    let info = bank.display_info();
    assert_eq!(info.method, "Bank Account");
    assert_eq!(info.display, "State Bank - ****9012");
    assert!(!info.display.contains("12345678"));
}

#[test]
fn profile_reports_payout_completeness() {
    let now = Utc::now();
    let user = User {
        id: Uuid::new_v4(),
        name: "Alice".to_string(),
        email: "alice@example.com".to_string(),
        password_hash: "hash".to_string(),
        role: UserRole::User,
        can_manage_payments: false,
        current_streak: 3,
        longest_streak: 5,
        total_videos: 8,
        last_upload_date: Some(now),
        rewards: vec![Uuid::new_v4()],
        payout: Some(PayoutDetails::Upi {
            upi_id: "alice@upi".to_string(),
            upi_name: "Alice".to_string(),
        }),
        is_active: true,
        created_at: now,
        updated_at: now,
    };

    let profile = ProfileDto::from(user);
    assert!(profile.payout_complete);
    assert_eq!(profile.payout_display.as_ref().map(|p| p.method.as_str()), Some("UPI"));
    assert_eq!(profile.rewards.len(), 1);

    let no_payout = User {
        id: Uuid::new_v4(),
        name: "Bob".to_string(),
        email: "bob@example.com".to_string(),
        password_hash: "hash".to_string(),
        role: UserRole::User,
        can_manage_payments: false,
        current_streak: 0,
        longest_streak: 0,
        total_videos: 0,
        last_upload_date: None,
        rewards: vec![],
        payout: None,
        is_active: true,
        created_at: now,
        updated_at: now,
    };

    let profile = ProfileDto::from(no_payout);
    assert!(!profile.payout_complete);
    assert!(profile.payout_display.is_none());
}

#[test]
fn serde_round_trips_tagged_variants() {
    let json = r#"{"method":"upi","upi_id":"alice@upi","upi_name":"Alice"}"#;
    let parsed: PayoutDetails = serde_json::from_str(json).unwrap();
    assert_eq!(
        parsed,
        PayoutDetails::Upi {
            upi_id: "alice@upi".to_string(),
            upi_name: "Alice".to_string(),
        }
    );

    let unknown = r#"{"method":"cheque","payee":"Alice"}"#;
    assert!(serde_json::from_str::<PayoutDetails>(unknown).is_err());
}
