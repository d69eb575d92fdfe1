//! Session configuration and validated maze dimensions

use std::time::Duration;

use crate::MazeError;

/// Smallest accepted width or height
pub const MIN_DIMENSION: usize = 5;
/// Largest accepted width or height
pub const MAX_DIMENSION: usize = 50;
/// Width and height used by [crate::Session::reset]
pub const DEFAULT_DIMENSION: usize = 20;
/// Pause between two traversal steps
pub const STEP_DELAY: Duration = Duration::from_millis(100);
/// Volume of the cue played for every visited cell
pub const NAVIGATION_VOLUME: f32 = 0.00625;
/// Volume of the cue played when the exit is found
pub const SUCCESS_VOLUME: f32 = 0.05;

/// Configuration of a maze session.
///
/// Dimension bounds are only set through [MazeConfig::with_bounds], so every
/// configuration describes mazes with an entrance and an exit.
#[derive(Debug, Clone, PartialEq)]
pub struct MazeConfig {
    min_dimension: usize,
    max_dimension: usize,
    default_dimensions: Dimensions,
    /// Delay between the end of one step and the start of the next one
    pub step_delay: Duration,
    /// Volume attached to navigation cues
    pub navigation_volume: f32,
    /// Volume attached to the success cue
    pub success_volume: f32,
    /// Random seed for reproducible mazes; `None` seeds from entropy
    pub seed: Option<u64>,
}

impl Default for MazeConfig {
    fn default() -> Self {
        Self {
            min_dimension: MIN_DIMENSION,
            max_dimension: MAX_DIMENSION,
            default_dimensions: Dimensions {
                width: DEFAULT_DIMENSION,
                height: DEFAULT_DIMENSION,
            },
            step_delay: STEP_DELAY,
            navigation_volume: NAVIGATION_VOLUME,
            success_volume: SUCCESS_VOLUME,
            seed: None,
        }
    }
}

impl MazeConfig {
    /// Replace the accepted dimension range and the size of reset mazes.
    ///
    /// `min` may not go below [MIN_DIMENSION], `min` may not exceed `max`,
    /// and `default` must lie within `min..=max`.
    ///
    /// # Examples
    /// ```
    /// use maze_pathfinder::MazeConfig;
    ///
    /// let config = MazeConfig::default().with_bounds(7, 31, 11).unwrap();
    /// assert_eq!(config.default_dimensions().width(), 11);
    /// assert!(MazeConfig::default().with_bounds(3, 31, 11).is_err());
    /// ```
    pub fn with_bounds(
        mut self,
        min: usize,
        max: usize,
        default: usize,
    ) -> Result<Self, MazeError> {
        if min < MIN_DIMENSION {
            return Err(MazeError::InvalidConfig(format!(
                "minimum dimension {min} is below {MIN_DIMENSION}"
            )));
        }
        if min > max {
            return Err(MazeError::InvalidConfig(format!(
                "minimum dimension {min} exceeds maximum {max}"
            )));
        }
        self.min_dimension = min;
        self.max_dimension = max;
        self.default_dimensions = Dimensions::new(default, default, &self).map_err(|_| {
            MazeError::InvalidConfig(format!(
                "default dimension {default} is outside {min}..={max}"
            ))
        })?;
        Ok(self)
    }

    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_step_delay(mut self, step_delay: Duration) -> Self {
        self.step_delay = step_delay;
        self
    }

    /// Smallest accepted width or height
    pub fn min_dimension(&self) -> usize {
        self.min_dimension
    }

    /// Largest accepted width or height
    pub fn max_dimension(&self) -> usize {
        self.max_dimension
    }

    /// Dimensions of the maze created on reset
    pub fn default_dimensions(&self) -> Dimensions {
        self.default_dimensions
    }

    fn check(&self, value: usize) -> Result<usize, MazeError> {
        if (self.min_dimension..=self.max_dimension).contains(&value) {
            Ok(value)
        } else {
            Err(self.invalid(value.to_string()))
        }
    }

    fn invalid(&self, value: String) -> MazeError {
        MazeError::InvalidDimension {
            value,
            min: self.min_dimension,
            max: self.max_dimension,
        }
    }
}

/// Width and height of a maze, checked against [MazeConfig] bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    width: usize,
    height: usize,
}

impl Dimensions {
    /// Validate numeric dimensions.
    ///
    /// # Examples
    /// ```
    /// use maze_pathfinder::{Dimensions, MazeConfig};
    ///
    /// let config = MazeConfig::default();
    /// assert!(Dimensions::new(5, 50, &config).is_ok());
    /// assert!(Dimensions::new(4, 20, &config).is_err());
    /// ```
    pub fn new(width: usize, height: usize, config: &MazeConfig) -> Result<Self, MazeError> {
        Ok(Self {
            width: config.check(width)?,
            height: config.check(height)?,
        })
    }

    /// Validate dimensions typed in by a user.
    ///
    /// Both values must parse as integers; surrounding whitespace is ignored.
    pub fn parse(width: &str, height: &str, config: &MazeConfig) -> Result<Self, MazeError> {
        let parse = |value: &str| {
            value
                .trim()
                .parse::<usize>()
                .map_err(|_| config.invalid(value.to_string()))
        };
        Self::new(parse(width)?, parse(height)?, config)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use crate::{Dimensions, MazeConfig, MazeError};

    #[test]
    fn bounds_are_inclusive() {
        let config = MazeConfig::default();
        assert!(Dimensions::new(5, 5, &config).is_ok());
        assert!(Dimensions::new(50, 50, &config).is_ok());
        assert!(Dimensions::new(4, 20, &config).is_err());
        assert!(Dimensions::new(51, 20, &config).is_err());
        assert!(Dimensions::new(20, 4, &config).is_err());
    }

    #[test]
    fn parse_user_input() {
        let config = MazeConfig::default();
        let dims = Dimensions::parse(" 12 ", "7", &config).unwrap();
        assert_eq!((dims.width(), dims.height()), (12, 7));

        assert_eq!(
            Dimensions::parse("abc", "10", &config),
            Err(MazeError::InvalidDimension {
                value: "abc".to_string(),
                min: 5,
                max: 50
            })
        );
        assert!(Dimensions::parse("", "10", &config).is_err());
        assert!(Dimensions::parse("10", "7.5", &config).is_err());
        assert!(Dimensions::parse("-10", "10", &config).is_err());
    }

    #[test]
    fn default_configuration() {
        let config = MazeConfig::default().with_seed(Some(3));
        assert_eq!(config.seed, Some(3));
        assert_eq!(config.step_delay, Duration::from_millis(100));
        let dims = config.default_dimensions();
        assert_eq!((dims.width(), dims.height()), (20, 20));
        assert_eq!((config.min_dimension(), config.max_dimension()), (5, 50));
    }

    #[test]
    fn custom_bounds_apply_to_dimensions() {
        let config = MazeConfig::default().with_bounds(9, 15, 9).unwrap();
        assert_eq!(config.default_dimensions(), Dimensions::new(9, 9, &config).unwrap());
        assert!(Dimensions::new(8, 9, &config).is_err());
        assert!(Dimensions::new(15, 16, &config).is_err());

        let single = MazeConfig::default().with_bounds(5, 5, 5).unwrap();
        assert_eq!(single.default_dimensions().width(), 5);
    }

    #[test]
    fn minimum_below_five_is_rejected() {
        for min in [0, 1, 4] {
            assert!(matches!(
                MazeConfig::default().with_bounds(min, 50, 20),
                Err(MazeError::InvalidConfig(_))
            ));
        }
    }

    #[test]
    fn minimum_above_maximum_is_rejected() {
        assert!(matches!(
            MazeConfig::default().with_bounds(30, 10, 20),
            Err(MazeError::InvalidConfig(_))
        ));
    }

    #[test]
    fn default_outside_bounds_is_rejected() {
        for default in [0, 6, 31] {
            assert!(matches!(
                MazeConfig::default().with_bounds(7, 30, default),
                Err(MazeError::InvalidConfig(_))
            ));
        }
    }
}
