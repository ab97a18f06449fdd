//! Implementations for the WheelCtrl state structure

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::Serialize;
use std::{convert::Infallible, sync::Arc};

// Internal
use super::{ErrorSign, WheelCtrlError, WheelParams};
use crate::{
    duty_map::VelDutyCurve,
    eqpt::{ActuatorDemand, DutyRange},
    pid_ctrl::PidCtrl,
    vel_est::{self, EncoderSample, EncoderState},
};
use comms_if::{eqpt::WheelId, tm::WheelTm};
use util::module::State;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Wheel controller state.
pub struct WheelCtrl {
    id: WheelId,
    cadence_ms: u64,
    error_sign: ErrorSign,
    apply_curve: bool,
    duty_range: DutyRange,

    encoder: EncoderState,
    pid: PidCtrl,
    curve: Arc<VelDutyCurve>,

    num_passes: u64,
}

/// Input data to a control pass.
#[derive(Debug, Clone, Copy)]
pub struct InputData {
    /// Target velocity.
    ///
    /// Units: RPM
    pub target_rpm: f32,

    /// The encoder reading, or `None` if the counter could not be read.
    pub sample: Option<EncoderSample>,
}

/// Output of a control pass.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct OutputData {
    /// Demand the actuator must apply.
    pub demand: ActuatorDemand,

    /// Telemetry describing the pass.
    pub tm: WheelTm,
}

/// Status report for a control pass.
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq)]
pub struct StatusReport {
    /// The encoder could not be read, zero duty was demanded.
    pub sensor_fault: bool,

    /// The regulator output was clamped.
    pub regulator_saturated: bool,

    /// The duty was limited to the wheel's duty range.
    pub duty_limited: bool,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl WheelCtrl {
    pub fn new(
        params: &WheelParams,
        encoder: &vel_est::Params,
        curve: Arc<VelDutyCurve>,
    ) -> Result<Self, WheelCtrlError> {
        let pid =
            PidCtrl::new(&params.pid).map_err(|e| WheelCtrlError::InvalidPid(params.id, e))?;

        Ok(Self {
            id: params.id,
            cadence_ms: params.cadence_ms,
            error_sign: params.error_sign,
            apply_curve: params.apply_curve,
            duty_range: params.duty_range,
            encoder: EncoderState::new(encoder),
            pid,
            curve,
            num_passes: 0,
        })
    }

    pub fn id(&self) -> WheelId {
        self.id
    }

    pub fn cadence_ms(&self) -> u64 {
        self.cadence_ms
    }

    pub fn num_passes(&self) -> u64 {
        self.num_passes
    }

    pub fn encoder(&self) -> &EncoderState {
        &self.encoder
    }

    pub fn pid(&self) -> &PidCtrl {
        &self.pid
    }
}

impl State for WheelCtrl {
    type InputData = InputData;
    type OutputData = OutputData;
    type StatusReport = StatusReport;
    type ProcError = Infallible;

    /// Perform one control pass.
    fn proc(
        &mut self,
        input_data: &Self::InputData,
    ) -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError> {
        let mut report = StatusReport::default();
        self.num_passes += 1;

        let sample = match input_data.sample {
            Some(s) => s,
            None => {
                report.sensor_fault = true;
                let tm = WheelTm {
                    target_rpm: input_data.target_rpm,
                    velocity_rpm: self.encoder.velocity_rpm(),
                    position: self.encoder.position(),
                    regulator_output: self.pid.output(),
                    duty_pct: 0.0,
                    num_passes: self.num_passes,
                };
                return Ok((
                    OutputData {
                        demand: ActuatorDemand::stopped(),
                        tm,
                    },
                    report,
                ));
            }
        };

        let (velocity_rpm, position) = self.encoder.sample(sample);

        let error = self.error_sign.error(input_data.target_rpm, velocity_rpm);
        let regulator_output = self.pid.update(error);
        report.regulator_saturated = self.pid.is_saturated();

        let duty = if self.apply_curve {
            self.curve.map(regulator_output)
        } else {
            regulator_output
        };

        let (demand, duty_limited) = self.duty_range.demand(duty);
        report.duty_limited = duty_limited;

        let tm = WheelTm {
            target_rpm: input_data.target_rpm,
            velocity_rpm,
            position,
            regulator_output,
            duty_pct: demand.signed_duty(),
            num_passes: self.num_passes,
        };

        Ok((OutputData { demand, tm }, report))
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
