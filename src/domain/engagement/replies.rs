//! Reply generation.
//!
//! Replies come from template buckets keyed by persona trait, turn band,
//! and whether the last turn captured new high-value intelligence. Once the
//! haul is nearly sufficient the generator favors stalling phrasing to keep
//! the adversary talking without advancing anything real.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::domain::detection::ScamType;
use crate::domain::persona::{Persona, PersonaTrait};

/// Neutral response for messages that never engage.
pub const NEUTRAL_REPLY: &str = "Thank you for your message.";

/// Sign-off sent when the termination policy ends an engaged session.
pub const CLOSING_REPLY: &str = "Thank you for the information. I need to go now.";

/// Coarse position within the conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnBand {
    Early,
    Mid,
    Late,
}

impl TurnBand {
    /// Bands turn numbers: 1-2 early, 3-5 mid, 6+ late.
    pub fn from_turn(turn: u32) -> Self {
        match turn {
            0..=2 => TurnBand::Early,
            3..=5 => TurnBand::Mid,
            _ => TurnBand::Late,
        }
    }
}

/// What the current turn looks like to the reply selector.
#[derive(Debug, Clone, Copy)]
pub struct ReplyContext {
    pub turn: u32,
    /// The just-processed message added at least one high-value artifact.
    pub captured_new_intel: bool,
    /// The accumulated record is close to (or at) the sufficient mark.
    pub near_sufficient: bool,
}

/// Picks reply text from the template buckets.
#[derive(Debug, Clone, Default)]
pub struct ReplyGenerator;

impl ReplyGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Opening reply for a freshly-engaged session, keyed by persona and
    /// scam type.
    pub fn opening(&self, persona: &Persona, scam_type: ScamType) -> String {
        self.opening_with(persona, scam_type, &mut rand::thread_rng())
    }

    /// Opening reply with a caller-supplied RNG (deterministic in tests).
    pub fn opening_with<R: Rng + ?Sized>(
        &self,
        persona: &Persona,
        scam_type: ScamType,
        rng: &mut R,
    ) -> String {
        let lead = choose(opening_leads(persona.primary_trait), rng);
        let hook = choose(opening_hooks(scam_type), rng);
        format!("{} {}", lead, hook)
    }

    /// Follow-up reply for an engaged session.
    pub fn follow_up(&self, persona: &Persona, ctx: &ReplyContext) -> String {
        self.follow_up_with(persona, ctx, &mut rand::thread_rng())
    }

    /// Follow-up reply with a caller-supplied RNG.
    pub fn follow_up_with<R: Rng + ?Sized>(
        &self,
        persona: &Persona,
        ctx: &ReplyContext,
        rng: &mut R,
    ) -> String {
        let bucket = self.bucket_for(persona, ctx);
        let base = choose(bucket, rng);
        style(persona.primary_trait, ctx.turn, base, rng)
    }

    /// Bucket selection: stalling once near-sufficient, acknowledgment after
    /// a fresh capture, probing once the persona would plausibly ask, else
    /// band-appropriate compliance.
    fn bucket_for(&self, persona: &Persona, ctx: &ReplyContext) -> &'static [&'static str] {
        if ctx.near_sufficient {
            return STALLING;
        }
        if ctx.captured_new_intel {
            return ACKNOWLEDGE_CAPTURE;
        }
        if ctx.turn >= persona.vulnerability.min_probe_turn() {
            return PROBE_FOR_DETAILS;
        }
        match TurnBand::from_turn(ctx.turn) {
            TurnBand::Early => COMPLY_EARLY,
            TurnBand::Mid => COMPLY_MID,
            TurnBand::Late => COMPLY_LATE,
        }
    }
}

fn choose<'a, R: Rng + ?Sized>(bucket: &[&'a str], rng: &mut R) -> &'a str {
    bucket.choose(rng).copied().unwrap_or(NEUTRAL_REPLY)
}

/// Persona-flavored framing, in the manner of the decoy's register.
fn style<R: Rng + ?Sized>(trait_: PersonaTrait, turn: u32, base: &str, rng: &mut R) -> String {
    match trait_ {
        PersonaTrait::Hesitant => {
            if turn <= 2 {
                format!("I'm not sure I understand... {}", base)
            } else if rng.gen_bool(0.3) {
                format!("{} Is this safe?", base)
            } else {
                base.to_string()
            }
        }
        PersonaTrait::Eager => {
            if rng.gen_bool(0.4) {
                format!("{} How quickly can we do this?", base)
            } else {
                base.to_string()
            }
        }
        PersonaTrait::Anxious => {
            if turn <= 3 {
                format!("Oh no, {}", lowercase_first(base))
            } else {
                base.to_string()
            }
        }
        PersonaTrait::Brisk => {
            // Keep it short: first sentence only.
            match base.split_once('.') {
                Some((first, _)) if turn > 1 => format!("{}.", first),
                _ => base.to_string(),
            }
        }
    }
}

fn lowercase_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn opening_leads(trait_: PersonaTrait) -> &'static [&'static str] {
    match trait_ {
        PersonaTrait::Hesitant => &[
            "I received your message. I'm not very good with these things, can you help me understand?",
            "Hello? I'm a bit confused by your message.",
            "My grandson usually helps me with this, but he's not here right now.",
        ],
        PersonaTrait::Eager => &[
            "Hi! I just saw your message. This sounds interesting!",
            "Wow, really? Tell me more!",
            "I'm excited! What do I need to do next?",
        ],
        PersonaTrait::Anxious => &[
            "I just saw this message. Is everything okay?",
            "What's this about? Is there a problem?",
            "I'm worried now. Please tell me what's happening.",
        ],
        PersonaTrait::Brisk => &[
            "I saw your message. I'm in the middle of something, but what's this about?",
            "Quick question - what do you need from me?",
            "I have a few minutes. What's the issue?",
        ],
    }
}

fn opening_hooks(scam_type: ScamType) -> &'static [&'static str] {
    match scam_type {
        ScamType::BankingFraud => &[
            "What happened to my account?",
            "Is my money safe?",
        ],
        ScamType::UpiPayment => &[
            "Which app do I need to open for this?",
            "I use that app for groceries, what went wrong?",
        ],
        ScamType::Impersonation => &[
            "I have never been in trouble before, what should I do?",
            "Which office are you calling from?",
        ],
        ScamType::TechSupport => &[
            "My computer has been slow lately, is that why?",
            "What do I need to click?",
        ],
        ScamType::PrizeLottery => &[
            "How do I claim it?",
            "I never win anything, what do I do now?",
        ],
        ScamType::InvestmentCrypto => &[
            "How much can I really earn?",
            "How do I get started?",
        ],
    }
}

/// Stalling and deflection once enough has been collected.
static STALLING: &[&str] = &[
    "Okay, I am writing all of this down, give me a minute.",
    "My internet is very slow today, the page is still loading.",
    "I will go to the bank first thing tomorrow morning and do it.",
    "Let me find my reading glasses, the numbers are very small.",
    "My phone battery is about to die, I will message you after it charges.",
];

/// A capture just landed: acknowledge and keep the channel warm.
static ACKNOWLEDGE_CAPTURE: &[&str] = &[
    "Let me note that down carefully. Can you repeat it once so I am sure?",
    "Okay, I have written it down. Is there any other number I should keep ready?",
    "Got it. And is there a backup way to reach you if this fails?",
];

/// The persona plausibly asks for payment details now.
static PROBE_FOR_DETAILS: &[&str] = &[
    "Where exactly should I send the money?",
    "What account number do I need?",
    "What's your UPI ID?",
    "Should I use UPI or bank transfer?",
    "What information do you need from me?",
];

static COMPLY_EARLY: &[&str] = &[
    "Okay, I understand. What's next?",
    "Yes, I can do that. Please tell me more.",
    "I'm following along. What should I do now?",
];

static COMPLY_MID: &[&str] = &[
    "Alright, I'm ready. What information do you need?",
    "I see. Can you explain the next step?",
    "Okay. How long will this take?",
];

static COMPLY_LATE: &[&str] = &[
    "I'm still here. What else do you need?",
    "This is taking a while, but okay. What now?",
    "Please bear with me, I'm doing my best. What's the next step?",
];
