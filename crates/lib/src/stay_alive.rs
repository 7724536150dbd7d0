//! Stay-alive flag: whether a closed conversation should leave the process running.

/// Environment variable consulted by [`EnvStayAlive`].
pub const STAY_ALIVE_ENV: &str = "STAY_ALIVE_ON_GOODBYE";

pub trait StayAliveFlag: Send + Sync {
    fn stay_alive(&self) -> bool;
}

/// Fixed value injected by the host.
impl StayAliveFlag for bool {
    fn stay_alive(&self) -> bool {
        *self
    }
}

/// Reads [`STAY_ALIVE_ENV`] on every call, so external changes apply to the next conversation.
#[derive(Debug, Default, Clone, Copy)]
pub struct EnvStayAlive;

impl StayAliveFlag for EnvStayAlive {
    fn stay_alive(&self) -> bool {
        parse_stay_alive(std::env::var(STAY_ALIVE_ENV).ok().as_deref())
    }
}

/// True only for the exact string `"true"`: case-sensitive, no trimming.
pub fn parse_stay_alive(value: Option<&str>) -> bool {
    value == Some("true")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_exact_true_stays_alive() {
        assert!(parse_stay_alive(Some("true")));
        for v in ["", "false", "TRUE", "True", "1", " true", "true\n", "yes"] {
            assert!(!parse_stay_alive(Some(v)), "{:?} must not stay alive", v);
        }
        assert!(!parse_stay_alive(None));
    }

    #[test]
    fn fixed_flag() {
        assert!(true.stay_alive());
        assert!(!false.stay_alive());
    }
}
