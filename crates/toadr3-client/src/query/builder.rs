use tracing::debug;

use crate::error::{Result, ToadrClientError};

use super::{
    QueryArgs, QueryParameter, QueryParams, CLIENT_NAME, EVENT_ID, OBJECTS, PROGRAM_ID,
    PROGRAM_ID_REQUIRED, SKIP_AND_LIMIT, SUBSCRIPTION_ID, TARGETS,
};

/// Ordered set of query parameter modules accepted by one endpoint
#[derive(Clone, Copy)]
pub struct ParameterBuilder {
    parameters: &'static [&'static dyn QueryParameter],
}

impl std::fmt::Debug for ParameterBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParameterBuilder")
            .field("parameters", &self.parameters.len())
            .finish()
    }
}

impl ParameterBuilder {
    pub const fn new(parameters: &'static [&'static dyn QueryParameter]) -> Self {
        Self { parameters }
    }

    /// Validate `args` against every module, reporting all problems at once
    pub fn check(&self, args: &QueryArgs) -> Result<()> {
        let mut errors = Vec::new();
        for parameter in self.parameters {
            parameter.check(&mut errors, args);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ToadrClientError::Validation(errors.join(", ")))
        }
    }

    /// Project `args` onto wire names on top of `extra`
    ///
    /// Named arguments replace extra parameters with the same wire name.
    pub fn build(&self, args: &QueryArgs, extra: &QueryParams) -> QueryParams {
        let mut params = extra.clone();
        for parameter in self.parameters {
            parameter.create(&mut params, args);
        }
        debug!(count = params.len(), "Built query parameters");
        params
    }

    /// [`check`](Self::check) then [`build`](Self::build)
    pub fn check_and_build(&self, args: &QueryArgs, extra: &QueryParams) -> Result<QueryParams> {
        self.check(args)?;
        Ok(self.build(args, extra))
    }
}

/// `GET /events`
pub const EVENTS: ParameterBuilder =
    ParameterBuilder::new(&[&PROGRAM_ID, &TARGETS, &SKIP_AND_LIMIT]);

/// `GET /programs`
pub const PROGRAMS: ParameterBuilder = ParameterBuilder::new(&[&TARGETS, &SKIP_AND_LIMIT]);

/// `GET|PUT|DELETE /programs/{id}`
pub const PROGRAM_BY_ID: ParameterBuilder = ParameterBuilder::new(&[&PROGRAM_ID_REQUIRED]);

/// `GET /reports`
pub const REPORTS: ParameterBuilder =
    ParameterBuilder::new(&[&PROGRAM_ID, &EVENT_ID, &CLIENT_NAME, &SKIP_AND_LIMIT]);

/// `GET /subscriptions`
pub const SUBSCRIPTIONS: ParameterBuilder = ParameterBuilder::new(&[
    &PROGRAM_ID,
    &CLIENT_NAME,
    &TARGETS,
    &OBJECTS,
    &SKIP_AND_LIMIT,
]);

/// `GET|PUT|DELETE /subscriptions/{id}`
pub const SUBSCRIPTION_BY_ID: ParameterBuilder = ParameterBuilder::new(&[&SUBSCRIPTION_ID]);
