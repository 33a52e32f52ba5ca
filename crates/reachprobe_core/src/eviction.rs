/// Cache-clearing commands for the rendering surface, ordered by severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CacheAction {
    /// Drop cached resources; keeps cookies and form data so signed-in sessions survive.
    ClearCacheOnly,
    ClearCacheAndFormData,
    /// Cache, history and form data, plus a reclamation hint.
    ClearAllAndHistory,
}

/// Lifecycle events that prompt a memory evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleTrigger {
    NavigationStarted,
    NavigationFinished,
    LowMemory,
}

impl LifecycleTrigger {
    fn severity_cap(self) -> CacheAction {
        match self {
            LifecycleTrigger::NavigationStarted => CacheAction::ClearCacheOnly,
            LifecycleTrigger::NavigationFinished => CacheAction::ClearCacheAndFormData,
            LifecycleTrigger::LowMemory => CacheAction::ClearAllAndHistory,
        }
    }
}

/// Memory utilization read at a single instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemorySample {
    pub used_bytes: u64,
    pub max_bytes: u64,
}

impl MemorySample {
    /// `used / max`, or `None` when the maximum is unknown (zero).
    pub fn ratio(&self) -> Option<f64> {
        if self.max_bytes == 0 {
            None
        } else {
            Some(self.used_bytes as f64 / self.max_bytes as f64)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EvictionTier {
    pub ratio: f64,
    pub action: CacheAction,
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum PolicyError {
    #[error("tier ratio {ratio} must lie in (0, 1]")]
    RatioOutOfRange { ratio: f64 },
    #[error("tier {index} does not increase both ratio and severity over its predecessor")]
    NotIncreasing { index: usize },
}

/// Graduated eviction thresholds.
#[derive(Debug, Clone, PartialEq)]
pub struct EvictionPolicy {
    tiers: Vec<EvictionTier>,
}

impl Default for EvictionPolicy {
    fn default() -> Self {
        Self {
            tiers: vec![
                EvictionTier {
                    ratio: 0.75,
                    action: CacheAction::ClearCacheOnly,
                },
                EvictionTier {
                    ratio: 0.80,
                    action: CacheAction::ClearCacheAndFormData,
                },
            ],
        }
    }
}

impl EvictionPolicy {
    /// Validates that ratios and actions strictly increase together.
    pub fn new(tiers: Vec<EvictionTier>) -> Result<Self, PolicyError> {
        for tier in &tiers {
            if !(tier.ratio > 0.0 && tier.ratio <= 1.0) {
                return Err(PolicyError::RatioOutOfRange { ratio: tier.ratio });
            }
        }
        for (index, pair) in tiers.windows(2).enumerate() {
            if pair[1].ratio <= pair[0].ratio || pair[1].action <= pair[0].action {
                return Err(PolicyError::NotIncreasing { index: index + 1 });
            }
        }
        Ok(Self { tiers })
    }

    pub fn tiers(&self) -> &[EvictionTier] {
        &self.tiers
    }

    /// Most severe tier whose threshold the sample exceeds, if any.
    pub fn evaluate(&self, sample: MemorySample) -> Option<CacheAction> {
        self.most_severe_below(sample, CacheAction::ClearAllAndHistory)
    }

    /// Evaluation in a lifecycle context. Navigation start never goes beyond
    /// clearing the cache, navigation finish may also clear form data, and the
    /// OS low-memory signal clears everything regardless of the sample.
    pub fn evaluate_for(
        &self,
        trigger: LifecycleTrigger,
        sample: MemorySample,
    ) -> Option<CacheAction> {
        match trigger {
            LifecycleTrigger::LowMemory => Some(CacheAction::ClearAllAndHistory),
            _ => self.most_severe_below(sample, trigger.severity_cap()),
        }
    }

    fn most_severe_below(&self, sample: MemorySample, cap: CacheAction) -> Option<CacheAction> {
        let ratio = sample.ratio()?;
        self.tiers
            .iter()
            .rev()
            .find(|tier| tier.action <= cap && ratio > tier.ratio)
            .map(|tier| tier.action)
    }
}
