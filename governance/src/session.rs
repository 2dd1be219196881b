//! Client claim flow: verify → birthdate → discovery → results → explore.
//!
//! The session owns nothing persistent. Its one policy decision is what a
//! failed backend verification means, captured by [`VerificationPolicy`].

use birthright_balance::{BalanceEngine, Clock};
use birthright_types::{Birthdate, GovernmentLevel, TimeBalance, VerificationLevel, VerificationResult};
use serde::{Deserialize, Serialize};

use crate::allocation::{AllocationTable, Allocator};
use crate::error::SessionError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Screen {
    Welcome,
    Birthdate,
    Discovering,
    TwoNumbers,
    Explore,
}

/// What a failed backend verification does to the flow.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerificationPolicy {
    /// Stay on the welcome screen and surface the error.
    #[default]
    Strict,
    /// Log the failure and let the user continue (demo mode).
    Lenient,
}

/// The humanity credential the widget reported for this session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VerifiedHuman {
    pub verification_level: VerificationLevel,
    pub nullifier_hash: String,
    /// Whether the backend proxy confirmed the proof.
    pub backend_confirmed: bool,
}

#[derive(Clone, Debug)]
pub struct ClaimSession {
    policy: VerificationPolicy,
    screen: Screen,
    human: Option<VerifiedHuman>,
    birthdate: Option<Birthdate>,
    balance: Option<TimeBalance>,
    allocations: Option<AllocationTable>,
    expanded_level: Option<GovernmentLevel>,
}

impl ClaimSession {
    pub fn new(policy: VerificationPolicy) -> Self {
        Self {
            policy,
            screen: Screen::Welcome,
            human: None,
            birthdate: None,
            balance: None,
            allocations: None,
            expanded_level: None,
        }
    }

    pub fn policy(&self) -> VerificationPolicy {
        self.policy
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn human(&self) -> Option<&VerifiedHuman> {
        self.human.as_ref()
    }

    pub fn birthdate(&self) -> Option<Birthdate> {
        self.birthdate
    }

    pub fn time_balance(&self) -> Option<TimeBalance> {
        self.balance
    }

    pub fn allocations(&self) -> Option<&AllocationTable> {
        self.allocations.as_ref()
    }

    pub fn expanded_level(&self) -> Option<GovernmentLevel> {
        self.expanded_level
    }

    fn expect_screen(&self, expected: Screen, action: &'static str) -> Result<(), SessionError> {
        if self.screen != expected {
            return Err(SessionError::InvalidTransition {
                from: self.screen,
                action,
            });
        }
        Ok(())
    }

    /// Record the widget's credential together with the backend's verdict.
    pub fn complete_verification(
        &mut self,
        verification_level: VerificationLevel,
        nullifier_hash: impl Into<String>,
        backend: &VerificationResult,
    ) -> Result<(), SessionError> {
        self.expect_screen(Screen::Welcome, "complete verification")?;

        if let VerificationResult::Failed { error_code, detail } = backend {
            let reason = detail.clone().unwrap_or_else(|| error_code.clone());
            match self.policy {
                VerificationPolicy::Strict => {
                    tracing::warn!(error = %error_code, "backend verification failed");
                    return Err(SessionError::VerificationFailed(reason));
                }
                VerificationPolicy::Lenient => {
                    tracing::warn!(error = %error_code, "backend verification failed, continuing in lenient mode");
                }
            }
        }

        self.human = Some(VerifiedHuman {
            verification_level,
            nullifier_hash: nullifier_hash.into(),
            backend_confirmed: backend.is_success(),
        });
        self.screen = Screen::Birthdate;
        Ok(())
    }

    pub fn set_birthdate(&mut self, birthdate: Birthdate) -> Result<(), SessionError> {
        self.expect_screen(Screen::Birthdate, "enter a birthdate")?;
        self.birthdate = Some(birthdate);
        Ok(())
    }

    /// Derive the balance once and start discovery.
    pub fn claim<C: Clock>(&mut self, engine: &BalanceEngine<C>) -> Result<TimeBalance, SessionError> {
        self.expect_screen(Screen::Birthdate, "claim")?;
        let birthdate = self.birthdate.ok_or(SessionError::MissingBirthdate)?;
        let balance = engine.claim(birthdate)?;
        self.balance = Some(balance);
        self.screen = Screen::Discovering;
        Ok(balance)
    }

    /// Allocate the claimed balance and show the results.
    pub fn finish_discovery(&mut self, allocator: &Allocator) -> Result<&AllocationTable, SessionError> {
        self.expect_screen(Screen::Discovering, "finish discovery")?;
        let balance = self.balance.unwrap_or_default();
        self.screen = Screen::TwoNumbers;
        Ok(&*self.allocations.insert(allocator.allocate(balance)))
    }

    pub fn explore(&mut self) -> Result<(), SessionError> {
        self.expect_screen(Screen::TwoNumbers, "explore")?;
        self.screen = Screen::Explore;
        Ok(())
    }

    pub fn back(&mut self) -> Result<(), SessionError> {
        self.expect_screen(Screen::Explore, "go back")?;
        self.screen = Screen::TwoNumbers;
        Ok(())
    }

    /// Expand `level`, or collapse it if it is already expanded.
    pub fn toggle_level(&mut self, level: GovernmentLevel) -> Result<Option<GovernmentLevel>, SessionError> {
        self.expect_screen(Screen::Explore, "expand a level")?;
        self.expanded_level = if self.expanded_level == Some(level) {
            None
        } else {
            Some(level)
        };
        Ok(self.expanded_level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::LevelWeights;
    use crate::roster::StaticRoster;
    use chrono::NaiveDate;
    use std::sync::Arc;

    struct FixedClock(NaiveDate);

    impl Clock for FixedClock {
        fn today(&self) -> NaiveDate {
            self.0
        }
    }

    fn engine() -> BalanceEngine<FixedClock> {
        BalanceEngine::with_clock(FixedClock(NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()))
    }

    fn allocator() -> Allocator {
        Allocator::new(Arc::new(StaticRoster::san_francisco()), LevelWeights::reference())
    }

    fn verified() -> VerificationResult {
        VerificationResult::Verified {
            nullifier_hash: "0xnull".into(),
            verification_level: Some(VerificationLevel::Device),
        }
    }

    fn rejected() -> VerificationResult {
        VerificationResult::Failed {
            error_code: "invalid_proof".into(),
            detail: Some("Proof is invalid".into()),
        }
    }

    #[test]
    fn full_flow() {
        let mut session = ClaimSession::new(VerificationPolicy::Strict);
        session
            .complete_verification(VerificationLevel::Device, "0xnull", &verified())
            .unwrap();
        assert_eq!(session.screen(), Screen::Birthdate);
        assert!(session.human().unwrap().backend_confirmed);

        session
            .set_birthdate(Birthdate::from_ymd(2026, 9, 19).unwrap())
            .unwrap();
        let balance = session.claim(&engine()).unwrap();
        assert_eq!(balance, TimeBalance::new(30));
        assert_eq!(session.screen(), Screen::Discovering);

        let total = session.finish_discovery(&allocator()).unwrap().total();
        assert!(total <= 30);
        assert_eq!(session.screen(), Screen::TwoNumbers);

        session.explore().unwrap();
        assert_eq!(session.toggle_level(GovernmentLevel::State).unwrap(), Some(GovernmentLevel::State));
        assert_eq!(session.toggle_level(GovernmentLevel::State).unwrap(), None);
        session.back().unwrap();
        assert_eq!(session.screen(), Screen::TwoNumbers);
    }

    #[test]
    fn strict_policy_blocks_failed_verification() {
        let mut session = ClaimSession::new(VerificationPolicy::Strict);
        let err = session
            .complete_verification(VerificationLevel::Orb, "0xnull", &rejected())
            .unwrap_err();
        assert_eq!(err, SessionError::VerificationFailed("Proof is invalid".into()));
        assert_eq!(session.screen(), Screen::Welcome);
        assert!(session.human().is_none());
    }

    #[test]
    fn lenient_policy_continues_after_failed_verification() {
        let mut session = ClaimSession::new(VerificationPolicy::Lenient);
        session
            .complete_verification(VerificationLevel::Orb, "0xnull", &rejected())
            .unwrap();
        assert_eq!(session.screen(), Screen::Birthdate);
        assert!(!session.human().unwrap().backend_confirmed);
    }

    #[test]
    fn claim_without_birthdate_fails() {
        let mut session = ClaimSession::new(VerificationPolicy::Lenient);
        session
            .complete_verification(VerificationLevel::Device, "0xnull", &verified())
            .unwrap();
        assert_eq!(session.claim(&engine()).unwrap_err(), SessionError::MissingBirthdate);
    }

    #[test]
    fn future_birthdate_is_refused() {
        let mut session = ClaimSession::new(VerificationPolicy::Lenient);
        session
            .complete_verification(VerificationLevel::Device, "0xnull", &verified())
            .unwrap();
        session
            .set_birthdate(Birthdate::from_ymd(2030, 1, 1).unwrap())
            .unwrap();
        assert!(matches!(session.claim(&engine()), Err(SessionError::Balance(_))));
        assert_eq!(session.screen(), Screen::Birthdate);
    }

    #[test]
    fn out_of_order_transitions_rejected() {
        let mut session = ClaimSession::new(VerificationPolicy::Strict);
        assert!(matches!(
            session.explore(),
            Err(SessionError::InvalidTransition { from: Screen::Welcome, .. })
        ));
        assert!(session.set_birthdate(Birthdate::from_ymd(2000, 1, 1).unwrap()).is_err());
        assert!(session.finish_discovery(&allocator()).is_err());
    }
}
