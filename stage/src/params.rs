//! The closed set of rig controls driven by tracking.
//!
//! [`RigParameterSet`] stores one value per [`RigParam`] in a fixed array, so
//! building a set always writes every control. There is no way to carry a
//! single stale value forward from an older frame.

/// A rig control written from tracking data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RigParam {
    AngleX,
    AngleY,
    AngleZ,
    BodyAngleX,
    BodyAngleY,
    BodyAngleZ,
    EyeBallX,
    EyeBallY,
    MouthOpenY,
    MouthForm,
    EyeLOpen,
    EyeROpen,
}

impl RigParam {
    /// Every parameter, in write order.
    pub const ALL: [Self; 12] = [
        Self::AngleX,
        Self::AngleY,
        Self::AngleZ,
        Self::BodyAngleX,
        Self::BodyAngleY,
        Self::BodyAngleZ,
        Self::EyeBallX,
        Self::EyeBallY,
        Self::MouthOpenY,
        Self::MouthForm,
        Self::EyeLOpen,
        Self::EyeROpen,
    ];

    /// The parameter id on the rig's float-parameter interface.
    #[must_use]
    pub fn id(self) -> &'static str {
        match self {
            Self::AngleX => "PARAM_ANGLE_X",
            Self::AngleY => "PARAM_ANGLE_Y",
            Self::AngleZ => "PARAM_ANGLE_Z",
            Self::BodyAngleX => "PARAM_BODY_ANGLE_X",
            Self::BodyAngleY => "PARAM_BODY_ANGLE_Y",
            Self::BodyAngleZ => "PARAM_BODY_ANGLE_Z",
            Self::EyeBallX => "PARAM_EYE_BALL_X",
            Self::EyeBallY => "PARAM_EYE_BALL_Y",
            Self::MouthOpenY => "PARAM_MOUTH_OPEN_Y",
            Self::MouthForm => "PARAM_MOUTH_FORM",
            Self::EyeLOpen => "PARAM_EYE_L_OPEN",
            Self::EyeROpen => "PARAM_EYE_R_OPEN",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// A complete assignment of values to every [`RigParam`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RigParameterSet {
    values: [f64; 12],
}

impl RigParameterSet {
    /// Build a set by evaluating `value` once for every parameter.
    #[must_use]
    pub fn from_fn(mut value: impl FnMut(RigParam) -> f64) -> Self {
        let mut values = [0.0; 12];
        for param in RigParam::ALL {
            values[param.index()] = value(param);
        }
        Self { values }
    }

    #[must_use]
    pub fn get(&self, param: RigParam) -> f64 {
        self.values[param.index()]
    }

    /// `(parameter, value)` pairs in [`RigParam::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = (RigParam, f64)> + '_ {
        RigParam::ALL.into_iter().map(|param| (param, self.get(param)))
    }
}
