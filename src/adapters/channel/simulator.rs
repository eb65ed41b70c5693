//! Local scammer simulator.
//!
//! Plays scripted scam conversations so the whole engagement loop can run
//! without any external endpoint. Scripts cycle through per-category
//! follow-ups that deliberately leak the artifacts the extractor looks for.

use async_trait::async_trait;
use rand::seq::SliceRandom;
use std::collections::HashMap;
use std::sync::Mutex;
use uuid::Uuid;

use crate::domain::detection::ScamType;
use crate::ports::{ChannelError, ChannelSession, ScammerChannel};

/// Turns after which the scripted scammer loses interest.
const SCRIPT_TURN_LIMIT: u32 = 10;

struct ScriptState {
    scam_type: ScamType,
    turn: u32,
}

/// In-process scripted scammer.
#[derive(Default)]
pub struct SimulatedScammerChannel {
    conversations: Mutex<HashMap<String, ScriptState>>,
}

impl SimulatedScammerChannel {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ScammerChannel for SimulatedScammerChannel {
    async fn start_conversation(
        &self,
        scam_type: Option<ScamType>,
    ) -> Result<ChannelSession, ChannelError> {
        let scam_type = scam_type.unwrap_or_else(|| {
            *ScamType::ALL
                .choose(&mut rand::thread_rng())
                .expect("category list is non-empty")
        });

        let channel_id = Uuid::new_v4().to_string();
        let opening_message = openings(scam_type)
            .choose(&mut rand::thread_rng())
            .copied()
            .expect("script has openings")
            .to_string();

        let mut conversations = self
            .conversations
            .lock()
            .expect("simulator mutex poisoned");
        conversations.insert(
            channel_id.clone(),
            ScriptState { scam_type, turn: 0 },
        );

        Ok(ChannelSession {
            channel_id,
            opening_message,
            scam_type: Some(scam_type),
        })
    }

    async fn send_message(&self, channel_id: &str, _text: &str) -> Result<(), ChannelError> {
        let conversations = self
            .conversations
            .lock()
            .expect("simulator mutex poisoned");
        if conversations.contains_key(channel_id) {
            Ok(())
        } else {
            Err(ChannelError::NotFound(channel_id.to_string()))
        }
    }

    async fn get_response(&self, channel_id: &str) -> Result<Option<String>, ChannelError> {
        let mut conversations = self
            .conversations
            .lock()
            .expect("simulator mutex poisoned");
        let state = conversations
            .get_mut(channel_id)
            .ok_or_else(|| ChannelError::NotFound(channel_id.to_string()))?;

        state.turn += 1;
        if state.turn > SCRIPT_TURN_LIMIT {
            return Ok(None);
        }

        let script = follow_ups(state.scam_type);
        let line = script[(state.turn as usize - 1) % script.len()];
        Ok(Some(line.to_string()))
    }

    async fn end_conversation(&self, channel_id: &str) -> Result<(), ChannelError> {
        let mut conversations = self
            .conversations
            .lock()
            .expect("simulator mutex poisoned");
        conversations
            .remove(channel_id)
            .map(|_| ())
            .ok_or_else(|| ChannelError::NotFound(channel_id.to_string()))
    }
}

fn openings(scam_type: ScamType) -> &'static [&'static str] {
    match scam_type {
        ScamType::BankingFraud => &[
            "URGENT: Your bank account has been temporarily blocked due to suspicious activity. Verify now: http://fake-bank-verify.com",
            "Dear customer, your account will be suspended in 24 hours. Update your KYC immediately by calling +919876543210",
        ],
        ScamType::UpiPayment => &[
            "URGENT: Your UPI wallet payment failed. Claim your refund now: http://fake-upi-refund.com",
            "Accept this collect request of Rs 1 on your UPI wallet app immediately to receive Rs 10,000 cashback!",
        ],
        ScamType::Impersonation => &[
            "This is Income Tax Department. A case has been registered against you in court. Pay the fine immediately to avoid legal action and arrest.",
            "Police Department: A complaint and arrest warrant has been issued against you. Pay the fine or face court. Call +919876543210 immediately.",
        ],
        ScamType::TechSupport => &[
            "WARNING: 5 viruses detected on your computer! Your system is infected with malware. Call Microsoft Support at +919988776655 immediately!",
            "Your antivirus license has expired and your computer is infected with a virus. Renew immediately: http://fake-antivirus.com",
        ],
        ScamType::PrizeLottery => &[
            "Congratulations! You are the lucky winner of Rs 10,00,000 in the Mega Lottery Draw! Claim your prize now by paying a small processing fee!",
            "WINNER ALERT: Congratulations, you've been selected for a cash prize of Rs 5 lakhs in our lucky draw. Claim your reward now. Limited time offer!",
        ],
        ScamType::InvestmentCrypto => &[
            "Guaranteed 300% returns in 30 days! Make an investment in our crypto trading bot today and double your money. Limited time offer!",
            "Double your money in 7 days with our crypto trading system. Guaranteed returns and daily profit. Minimum investment Rs 10,000.",
        ],
    }
}

fn follow_ups(scam_type: ScamType) -> &'static [&'static str] {
    match scam_type {
        ScamType::BankingFraud => &[
            "Please provide your account number and IFSC code to verify your identity.",
            "Send Rs 500 to account 1234567890123 IFSC: SBIN0001234 for verification.",
            "Click this link immediately: http://phishing-site.com/verify",
            "Send money to UPI ID: scammer@paytm to activate your account.",
        ],
        ScamType::UpiPayment => &[
            "Send Rs 10 to UPI: refund@paytm to process your cashback.",
            "Transfer Rs 100 to account 2222333344445555 IFSC: BARB0001234 for wallet activation.",
            "Click this link to claim: http://fake-payment-link.com",
        ],
        ScamType::Impersonation => &[
            "Pay the fine of Rs 10,000 to account 7777888899990000 IFSC: PUNB0001234 within 2 hours.",
            "Send Rs 2000 via UPI: govt@oksbi to clear the case.",
            "Call this number +919123456789 to speak with the officer.",
        ],
        ScamType::TechSupport => &[
            "Pay Rs 3000 for virus removal. Send to UPI: techsupport@paytm",
            "Your Windows license is invalid. Pay Rs 5000 to account 5555666677778888 IFSC: ICIC0001234",
            "Call our toll-free number +918877665544 for immediate assistance.",
        ],
        ScamType::PrizeLottery => &[
            "To claim your prize, send Rs 2000 processing fee to account 9876543210987 IFSC: HDFC0001234",
            "Pay tax of Rs 5000 via UPI: winner@phonepe to receive your prize money.",
            "Call +919123456789 immediately to verify your winning.",
        ],
        ScamType::InvestmentCrypto => &[
            "Send Rs 20,000 to start earning. UPI: crypto@paytm",
            "Deposit to our Bitcoin wallet: 1A1zP1eP5QGefi2DMPTfTL5SLmv7DivfNa",
            "Transfer to account 3333444455556666 IFSC: AXIS0001234 to activate your account.",
        ],
    }
}
