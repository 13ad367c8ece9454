use std::str::FromStr;

use crate::error::{Result, SceneError};

/// Discrete user actions, applied synchronously by
/// [`DropScene::apply`](super::DropScene::apply).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SceneCommand {
    SpawnSphere,
    SpawnBrick,
    Reset,
    /// Vertical gravity component, negative pulls down.
    SetGravity(f32),
}

impl FromStr for SceneCommand {
    type Err = SceneError;

    /// Accepts the UI control names: `drop-ball`, `drop-brick`, `clean`,
    /// and `gravity=<value>`.
    fn from_str(action: &str) -> Result<Self> {
        let action = action.trim();
        match action {
            "drop-ball" => Ok(Self::SpawnSphere),
            "drop-brick" => Ok(Self::SpawnBrick),
            "clean" => Ok(Self::Reset),
            _ => match action.strip_prefix("gravity=") {
                Some(value) => Ok(Self::SetGravity(GravityPreset::parse(value)?.value())),
                None => Err(SceneError::UnknownCommand(action.to_owned())),
            },
        }
    }
}

/// A gravity option as offered by the UI selector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GravityPreset(f32);

impl GravityPreset {
    pub fn parse(value: &str) -> Result<Self> {
        let parsed: f32 = value
            .trim()
            .parse()
            .map_err(|_| SceneError::InvalidGravity(value.to_owned()))?;
        if !parsed.is_finite() {
            return Err(SceneError::InvalidGravity(value.to_owned()));
        }
        Ok(Self(parsed))
    }

    pub fn value(self) -> f32 {
        self.0
    }

    /// Magnitude shown by the gravity gauge.
    pub fn gauge(self) -> f32 {
        self.0.abs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ui_actions_parse() {
        assert_eq!("drop-ball".parse::<SceneCommand>().ok(), Some(SceneCommand::SpawnSphere));
        assert_eq!("drop-brick".parse::<SceneCommand>().ok(), Some(SceneCommand::SpawnBrick));
        assert_eq!(" clean ".parse::<SceneCommand>().ok(), Some(SceneCommand::Reset));
        assert_eq!(
            "gravity=-1.62".parse::<SceneCommand>().ok(),
            Some(SceneCommand::SetGravity(-1.62))
        );
    }

    #[test]
    fn bad_input_is_reported() {
        assert!(matches!(
            "explode".parse::<SceneCommand>(),
            Err(SceneError::UnknownCommand(_))
        ));
        assert!(matches!(
            "gravity=heavy".parse::<SceneCommand>(),
            Err(SceneError::InvalidGravity(_))
        ));
        assert!(GravityPreset::parse("inf").is_err());
        assert!(GravityPreset::parse("NaN").is_err());
    }

    #[test]
    fn gauge_shows_magnitude() {
        let preset = GravityPreset::parse("-24.79").expect("numeric");
        assert_eq!(preset.value(), -24.79);
        assert_eq!(preset.gauge(), 24.79);
    }
}
