//! Sequential test execution.
//!
//! This module drives the ordered route list through the pipeline:
//! template resolution, request building, the transport call, response
//! validation, and variable extraction. Steps run strictly in list order
//! with fail-fast semantics: the first failing step halts the run and no
//! later step is attempted.

pub mod error;

pub use error::{ConfigError, RunnerError};

use crate::builder::build_request;
use crate::extractor::extract_variables;
use crate::models::{Expectations, HttpMethod, RouteSpec};
use crate::template::{resolve_headers, resolve_template, Context};
use crate::transport::Transport;
use crate::validator::validate_response;
use std::time::{Duration, Instant};
use url::Url;

/// Default base path segment inserted between the base URL and routes.
pub const DEFAULT_BASE_PATH: &str = "api";

/// Terminal state of one step.
#[derive(Debug)]
pub enum StepOutcome {
    /// The step completed validation and extraction.
    Passed {
        /// Wall-clock duration of the step, including the network call.
        duration: Duration,
    },

    /// The step was bypassed via `skip: true`; no request was sent and the
    /// context was left unchanged.
    Skipped,

    /// The step failed; this error terminated the run.
    Failed {
        /// The failure that halted the run.
        error: RunnerError,
    },
}

/// Per-step record in a run report.
#[derive(Debug)]
pub struct StepReport {
    /// The route's title.
    pub title: String,

    /// How the step ended.
    pub outcome: StepOutcome,
}

/// Structured result of a run.
///
/// The runner never terminates the process itself; hosts inspect the
/// report (or use [`RunReport::exit_code`]) and decide how to exit.
#[derive(Debug, Default)]
pub struct RunReport {
    /// One record per attempted step, in execution order. Routes after the
    /// first failure are absent: they were never attempted.
    pub steps: Vec<StepReport>,
}

impl RunReport {
    /// Checks whether every attempted step passed or was skipped.
    pub fn success(&self) -> bool {
        self.failure().is_none()
    }

    /// Returns the failing step's title and error, if the run failed.
    pub fn failure(&self) -> Option<(&str, &RunnerError)> {
        self.steps.iter().find_map(|step| match &step.outcome {
            StepOutcome::Failed { error } => Some((step.title.as_str(), error)),
            _ => None,
        })
    }

    /// Number of passed steps.
    pub fn passed(&self) -> usize {
        self.steps
            .iter()
            .filter(|s| matches!(s.outcome, StepOutcome::Passed { .. }))
            .count()
    }

    /// Number of skipped steps.
    pub fn skipped(&self) -> usize {
        self.steps
            .iter()
            .filter(|s| matches!(s.outcome, StepOutcome::Skipped))
            .count()
    }

    /// Process exit status for hosts: 0 when every step passed or was
    /// skipped, 1 otherwise.
    pub fn exit_code(&self) -> i32 {
        if self.success() {
            0
        } else {
            1
        }
    }
}

/// Sequential, fail-fast runner over an ordered route list.
///
/// Constructed from static configuration; configuration problems are
/// rejected here, before any step runs, and are never caught downstream.
#[derive(Debug)]
pub struct TestRunner {
    routes: Vec<RouteSpec>,
    base_url: String,
    base_path: String,
}

impl TestRunner {
    /// Creates a runner after validating the configuration.
    ///
    /// `base_path` defaults to `"api"` when not given.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the base URL does not parse, or when a
    /// route has an empty title, an empty URL, or an unknown HTTP method.
    pub fn new(
        routes: Vec<RouteSpec>,
        base_url: &str,
        base_path: Option<&str>,
    ) -> Result<Self, ConfigError> {
        Url::parse(base_url).map_err(|err| ConfigError::InvalidBaseUrl {
            url: base_url.to_string(),
            message: err.to_string(),
        })?;

        for (index, route) in routes.iter().enumerate() {
            if route.title.trim().is_empty() {
                return Err(ConfigError::EmptyTitle { index });
            }
            if route.url.trim().is_empty() {
                return Err(ConfigError::EmptyUrl {
                    title: route.title.clone(),
                });
            }
            if let Some(method) = &route.method {
                if HttpMethod::parse(method).is_none() {
                    return Err(ConfigError::UnknownMethod {
                        title: route.title.clone(),
                        method: method.clone(),
                    });
                }
            }
        }

        Ok(Self {
            routes,
            base_url: base_url.to_string(),
            base_path: base_path.unwrap_or(DEFAULT_BASE_PATH).to_string(),
        })
    }

    /// Runs every route in list order, stopping at the first failure.
    ///
    /// Each step fully completes (templating, building, the network call,
    /// validation, extraction) before the next begins; the network call is
    /// the only suspension point. The shared context is read before a step
    /// executes and written only after its response validates, so a step
    /// can see values from strictly earlier steps only.
    pub async fn run(&self, transport: &dyn Transport) -> RunReport {
        let mut context = Context::new();
        let mut report = RunReport::default();

        for (index, route) in self.routes.iter().enumerate() {
            log::info!("------------------------------------------------");
            log::info!("Run test [{}] - {}", index, route.title);

            if route.skip {
                log::info!("Test skipped...");
                report.steps.push(StepReport {
                    title: route.title.clone(),
                    outcome: StepOutcome::Skipped,
                });
                continue;
            }

            let started = Instant::now();
            match self.run_step(route, &mut context, transport).await {
                Ok(()) => {
                    let duration = started.elapsed();
                    log::info!("{}: {:?}", route.title, duration);
                    report.steps.push(StepReport {
                        title: route.title.clone(),
                        outcome: StepOutcome::Passed { duration },
                    });
                }
                Err(error) => {
                    match error.status_code() {
                        Some(code) => log::error!("statusCode: {}", code),
                        None => log::error!("statusCode: unknown code"),
                    }
                    log::error!("message: {}", error);
                    report.steps.push(StepReport {
                        title: route.title.clone(),
                        outcome: StepOutcome::Failed { error },
                    });
                    return report;
                }
            }
        }

        log::info!("All tests successfully passed!");
        report
    }

    /// Executes one non-skipped step.
    async fn run_step(
        &self,
        route: &RouteSpec,
        context: &mut Context,
        transport: &dyn Transport,
    ) -> Result<(), RunnerError> {
        let resolved_url = resolve_template(&route.url, context);
        let resolved_headers = route
            .headers
            .as_ref()
            .map(|headers| resolve_headers(headers, context));

        // Validated at construction; an unknown method cannot reach here
        let method = route
            .method
            .as_deref()
            .and_then(HttpMethod::parse)
            .unwrap_or(HttpMethod::GET);

        let descriptor = build_request(
            route,
            method,
            &resolved_url,
            resolved_headers,
            &self.base_url,
            &self.base_path,
        )
        .await?;

        if route.debug {
            log::debug!("[DEBUG ON]");
            log::debug!("--> Request options: {:#}", descriptor.describe());
        }

        let response = transport.send(&descriptor).await?;

        if route.debug {
            log::debug!("--> Body: {:#}", response.body);
            log::debug!("--> Headers: {:?}", response.headers);
        }

        let default_expect = Expectations::default();
        let expect = route.expect.as_ref().unwrap_or(&default_expect);
        validate_response(expect, &response)?;

        if let Some(variables) = &route.variables {
            extract_variables(variables, &response.body, context)?;
        }

        Ok(())
    }
}
