//! Optional observability helpers for token flows and middleware.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `oauth2_tooling.flow` with the `flow`
//!   (operation) and `stage` (call site) fields, plus `debug` events for middleware rejections.
//! - Enable `metrics` to increment the `oauth2_tooling_flow_total` counter for every
//!   attempt/success/failure, labeled by `flow` + `outcome`, and the
//!   `oauth2_tooling_rejection_total` counter for every rejected inbound request, labeled by
//!   `status`.

mod metrics;
mod tracing;

pub use self::metrics::*;
pub use self::tracing::*;

// self
use crate::{_prelude::*, flows::GrantType};

/// Operations observed by the crate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowKind {
	/// Password credentials token acquisition.
	PasswordCredentials,
	/// Authorization code token acquisition.
	AuthorizationCode,
	/// Tokeninfo (introspection) call.
	TokenInfo,
}
impl FlowKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowKind::PasswordCredentials => "password",
			FlowKind::AuthorizationCode => "authorization_code",
			FlowKind::TokenInfo => "token_info",
		}
	}
}
impl Display for FlowKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
impl From<GrantType> for FlowKind {
	fn from(grant: GrantType) -> Self {
		match grant {
			GrantType::PasswordCredentials => FlowKind::PasswordCredentials,
			GrantType::AuthorizationCode => FlowKind::AuthorizationCode,
		}
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowOutcome {
	/// Entry to an operation.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl FlowOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowOutcome::Attempt => "attempt",
			FlowOutcome::Success => "success",
			FlowOutcome::Failure => "failure",
		}
	}
}
impl Display for FlowOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Records the outcome of `fut` around its execution inside a [`FlowSpan`].
pub(crate) async fn observe<T, Fut>(kind: FlowKind, stage: &'static str, fut: Fut) -> Result<T>
where
	Fut: Future<Output = Result<T>>,
{
	let span = FlowSpan::new(kind, stage);

	record_flow_outcome(kind, FlowOutcome::Attempt);

	let result = span.instrument(fut).await;

	match &result {
		Ok(_) => record_flow_outcome(kind, FlowOutcome::Success),
		Err(_e) => {
			#[cfg(feature = "tracing")]
			::tracing::warn!(flow = kind.as_str(), stage, error = %_e, "Flow failed.");

			record_flow_outcome(kind, FlowOutcome::Failure)
		},
	}

	result
}
