//! Faction-scoped oracle.
//!
//! Wraps the fate chart and event tables with the framing the faction engine
//! needs: random events for action complications, fate checks for contested
//! territory, and detail checks for party work twists. Every outcome is a
//! structured [`OracleEvent`] holding tokens to interpret, never invented
//! facts.
//!
//! The oracle owns no randomness. Each call borrows the engine's dice so a
//! fixed seed reproduces oracle outcomes along with everything else.

use serde::{Deserialize, Serialize};
use tracing::debug;

use fw_core::DiceSource;

use crate::chaos::ChaosFactor;
use crate::oracle::fate_chart::{self, FateAnswer, Likelihood};
use crate::oracle::event::generate_random_event;
use crate::oracle::tables::MeaningTables;

/// Token used in placeholder events when the oracle is disabled.
pub const DISABLED_TOKEN: &str = "disabled";

/// Which oracle operation produced an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OracleEventKind {
    /// Focus plus meaning pair.
    RandomEvent,
    /// Yes/no question.
    FateCheck,
    /// Meaning pair only.
    DetailCheck,
}

/// Structured record of one oracle outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OracleEvent {
    /// Operation that produced the event.
    pub kind: OracleEventKind,
    /// Game date of the event.
    pub date: String,
    /// Context tag such as `action_complication` or `contested_territory`.
    pub tag: String,
    /// Faction the event concerns.
    #[serde(default)]
    pub faction_id: Option<String>,
    /// The question asked (fate checks).
    #[serde(default)]
    pub question: Option<String>,
    /// The answer (fate checks).
    #[serde(default)]
    pub result: Option<FateAnswer>,
    /// The likelihood asked with (fate checks).
    #[serde(default)]
    pub likelihood: Option<Likelihood>,
    /// The d100 roll (fate checks; absent when disabled).
    #[serde(default)]
    pub roll: Option<u32>,
    /// Focus key (random events).
    #[serde(default)]
    pub focus: Option<String>,
    /// Action word.
    #[serde(default)]
    pub action: Option<String>,
    /// Subject word.
    #[serde(default)]
    pub subject: Option<String>,
    /// Chaos factor when the event was generated.
    pub chaos_factor: u32,
}

impl OracleEvent {
    fn new(kind: OracleEventKind, date: &str, faction_id: Option<&str>, tag: &str, chaos: u32) -> Self {
        Self {
            kind,
            date: date.to_string(),
            tag: tag.to_string(),
            faction_id: faction_id.map(str::to_string),
            question: None,
            result: None,
            likelihood: None,
            roll: None,
            focus: None,
            action: None,
            subject: None,
            chaos_factor: chaos,
        }
    }

    /// `"{action} {subject}"`, or empty when either word is missing.
    pub fn meaning_pair(&self) -> String {
        match (&self.action, &self.subject) {
            (Some(action), Some(subject)) if !action.is_empty() && !subject.is_empty() => {
                format!("{action} {subject}")
            }
            _ => String::new(),
        }
    }

    /// Whether a fate check answered yes (including exceptional yes).
    pub fn is_yes(&self) -> bool {
        self.result.is_some_and(FateAnswer::is_yes)
    }

    /// Whether a fate check answered with either exceptional variant.
    pub fn is_exceptional(&self) -> bool {
        self.result.is_some_and(FateAnswer::is_exceptional)
    }

    /// One-line text for news and rumor feeds.
    pub fn as_rumor_text(&self) -> String {
        match self.kind {
            OracleEventKind::RandomEvent => {
                let focus = self
                    .focus
                    .as_deref()
                    .map_or_else(|| "Event".to_string(), title_case);
                format!(
                    "Oracle Event ({focus}): {} (interpretation needed)",
                    self.meaning_pair()
                )
            }
            OracleEventKind::FateCheck => {
                let result = self
                    .result
                    .map_or_else(|| "Unknown".to_string(), |r| r.to_string());
                let question = self.question.as_deref().unwrap_or("Contested outcome");
                format!("Oracle Fate ({}): {result} - {question}", self.tag)
            }
            OracleEventKind::DetailCheck => format!(
                "Oracle Twist ({}): {} (interpretation needed)",
                self.tag,
                self.meaning_pair()
            ),
        }
    }
}

/// `npc_action` -> `Npc Action`.
fn title_case(key: &str) -> String {
    key.split('_')
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars).collect::<String>()
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// An on/off switch for one oracle use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Toggle {
    /// Whether the use is on.
    pub enabled: bool,
}

impl Default for Toggle {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Settings for party work twists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartyWorkTwists {
    /// Whether twists are rolled at all.
    pub enabled: bool,
    /// Roll a twist on the extreme 2d6 results (2 and 12).
    pub on_extremes: bool,
}

impl Default for PartyWorkTwists {
    fn default() -> Self {
        Self {
            enabled: true,
            on_extremes: true,
        }
    }
}

/// Configuration of the faction oracle, usually the `oracle` block of the rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FactionOracleConfig {
    /// Master switch. When off, every call returns a placeholder without rolling.
    pub enabled: bool,
    /// Chaos factor for a fresh oracle.
    pub default_chaos_factor: u32,
    /// Roll a random event whenever an action roll flags a complication.
    pub auto_random_event_on_complication: bool,
    /// Resolve contested territory claims with a fate check.
    pub contested_territory: Toggle,
    /// Twists on party faction work.
    pub party_work_twists: PartyWorkTwists,
    /// Optional custom meaning tables.
    pub meaning_tables: MeaningTables,
}

impl Default for FactionOracleConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            default_chaos_factor: 5,
            auto_random_event_on_complication: true,
            contested_territory: Toggle::default(),
            party_work_twists: PartyWorkTwists::default(),
            meaning_tables: MeaningTables::default(),
        }
    }
}

impl FactionOracleConfig {
    /// A config with the master switch off.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    /// Whether complications should roll random events.
    pub fn complication_events(&self) -> bool {
        self.enabled && self.auto_random_event_on_complication
    }

    /// Whether contested claims go to the oracle.
    pub fn contested_territory(&self) -> bool {
        self.enabled && self.contested_territory.enabled
    }

    /// Whether extreme party work rolls produce twists.
    pub fn party_work_twists(&self) -> bool {
        self.enabled && self.party_work_twists.enabled && self.party_work_twists.on_extremes
    }
}

/// Persisted oracle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FactionOracleState {
    /// Current chaos factor.
    pub chaos_factor: ChaosFactor,
    /// Events recorded since the last cycle reset.
    pub events_this_cycle: u32,
    /// Events recorded over the life of the state.
    pub total_events: u64,
}

/// Faction-scoped oracle.
#[derive(Debug, Clone)]
pub struct FactionOracle {
    config: FactionOracleConfig,
    state: FactionOracleState,
    session_events: Vec<OracleEvent>,
}

impl Default for FactionOracle {
    fn default() -> Self {
        Self::new(FactionOracleConfig::default())
    }
}

impl FactionOracle {
    /// Create an oracle at the configured default chaos factor.
    pub fn new(config: FactionOracleConfig) -> Self {
        let state = FactionOracleState {
            chaos_factor: ChaosFactor::new(config.default_chaos_factor),
            ..FactionOracleState::default()
        };
        Self {
            config,
            state,
            session_events: Vec::new(),
        }
    }

    /// Create an oracle resuming a persisted state.
    pub fn with_state(config: FactionOracleConfig, state: FactionOracleState) -> Self {
        Self {
            config,
            state,
            session_events: Vec::new(),
        }
    }

    /// The configuration.
    pub fn config(&self) -> &FactionOracleConfig {
        &self.config
    }

    /// Whether the master switch is on.
    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// Current persisted state.
    pub fn state(&self) -> FactionOracleState {
        self.state
    }

    /// Replace the persisted state. Session events are kept.
    pub fn restore_state(&mut self, state: FactionOracleState) {
        self.state = state;
    }

    /// Current chaos factor.
    pub fn chaos_factor(&self) -> u32 {
        self.state.chaos_factor.value()
    }

    /// Set the chaos factor (clamped to 1-9). Returns the stored value.
    pub fn set_chaos_factor(&mut self, value: u32) -> u32 {
        self.state.chaos_factor.set(value)
    }

    /// Raise chaos by one.
    pub fn increase_chaos(&mut self) -> u32 {
        self.state.chaos_factor.increase()
    }

    /// Lower chaos by one.
    pub fn decrease_chaos(&mut self) -> u32 {
        self.state.chaos_factor.decrease()
    }

    /// Roll a random event: focus plus meaning pair.
    pub fn random_event(
        &mut self,
        dice: &mut dyn DiceSource,
        date: &str,
        faction_id: Option<&str>,
        tag: &str,
    ) -> OracleEvent {
        let mut event = OracleEvent::new(
            OracleEventKind::RandomEvent,
            date,
            faction_id,
            tag,
            self.chaos_factor(),
        );
        if !self.config.enabled {
            event.focus = Some(DISABLED_TOKEN.to_string());
            event.action = Some("oracle".to_string());
            event.subject = Some(DISABLED_TOKEN.to_string());
            return event;
        }

        let rolled = generate_random_event(dice, &self.config.meaning_tables);
        event.focus = Some(rolled.focus.key().to_string());
        event.action = Some(rolled.action);
        event.subject = Some(rolled.subject);
        self.record(event)
    }

    /// Roll a meaning pair without a focus.
    pub fn detail_check(
        &mut self,
        dice: &mut dyn DiceSource,
        date: &str,
        faction_id: Option<&str>,
        tag: &str,
    ) -> OracleEvent {
        let mut event = OracleEvent::new(
            OracleEventKind::DetailCheck,
            date,
            faction_id,
            tag,
            self.chaos_factor(),
        );
        if !self.config.enabled {
            event.action = Some("oracle".to_string());
            event.subject = Some(DISABLED_TOKEN.to_string());
            return event;
        }

        let meaning = self.config.meaning_tables.roll(dice);
        event.action = Some(meaning.action);
        event.subject = Some(meaning.subject);
        self.record(event)
    }

    /// Ask a yes/no question. Never chains a random event. A disabled oracle
    /// answers no without rolling.
    pub fn fate_check(
        &mut self,
        dice: &mut dyn DiceSource,
        question: &str,
        likelihood: Likelihood,
        date: &str,
        faction_id: Option<&str>,
        tag: &str,
    ) -> OracleEvent {
        let mut event = OracleEvent::new(
            OracleEventKind::FateCheck,
            date,
            faction_id,
            tag,
            self.chaos_factor(),
        );
        event.question = Some(question.to_string());
        event.likelihood = Some(likelihood);
        if !self.config.enabled {
            event.result = Some(FateAnswer::No);
            return event;
        }

        let check = fate_chart::consult(
            likelihood,
            self.chaos_factor(),
            dice,
            &self.config.meaning_tables,
            false,
        );
        event.result = Some(check.answer);
        event.roll = Some(check.roll);
        self.record(event)
    }

    fn record(&mut self, event: OracleEvent) -> OracleEvent {
        debug!(
            kind = ?event.kind,
            tag = %event.tag,
            faction = event.faction_id.as_deref().unwrap_or("-"),
            "oracle event"
        );
        self.state.events_this_cycle += 1;
        self.state.total_events += 1;
        self.session_events.push(event.clone());
        event
    }

    /// Reset the per-cycle event counter.
    pub fn reset_cycle_counter(&mut self) {
        self.state.events_this_cycle = 0;
    }

    /// Events recorded this session, oldest first.
    pub fn session_events(&self) -> &[OracleEvent] {
        &self.session_events
    }

    /// Forget this session's events. Counters are unaffected.
    pub fn clear_session_events(&mut self) {
        self.session_events.clear();
    }

    /// Likelihood that an attacker takes a held asset.
    ///
    /// Each level of advantage counts one step; every 50 points of hostility
    /// count one more (every 50 points of friendship one less).
    pub fn determine_contest_likelihood(
        &self,
        attacker_level: u32,
        defender_level: u32,
        relationship_score: i32,
    ) -> Likelihood {
        let level_diff = i64::from(attacker_level) - i64::from(defender_level);
        let relation = (-i64::from(relationship_score)).div_euclid(50);
        match level_diff + relation {
            t if t >= 3 => Likelihood::VeryLikely,
            t if t >= 1 => Likelihood::Likely,
            t if t >= -1 => Likelihood::FiftyFifty,
            t if t >= -2 => Likelihood::Unlikely,
            _ => Likelihood::VeryUnlikely,
        }
    }

    /// Whether a fate check event answered yes.
    pub fn is_yes(&self, event: &OracleEvent) -> bool {
        event.is_yes()
    }

    /// Whether a fate check event was exceptional.
    pub fn is_exceptional(&self, event: &OracleEvent) -> bool {
        event.is_exceptional()
    }
}
