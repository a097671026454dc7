//! The materialization orchestrator.

use crate::{ErrorPolicy, MaterializationReport, MaterializeError, Outcome};
use graft_core::{ErrorSink, NodeId};
use graft_expr::{EvaluationContext, ExpressionEvaluator};
use graft_graph::{ContentGraph, PlanExecutor};
use graft_plan::MaterializationPlanner;
use graft_schema::SchemaProvider;
use graft_template::{RawConfiguration, TemplateEvaluator, DEFAULT_MAX_DEPTH};
use graft_validate::PropertyConverter;
use tracing::{debug, warn};

/// Runs the full pipeline for one template against one graph node:
/// evaluate, plan (validating per node), apply the policy, execute.
///
/// The materializer is stateless across requests; graph, configuration and
/// context are handed in per call.
pub struct Materializer<'a> {
    schema: &'a dyn SchemaProvider,
    expressions: &'a dyn ExpressionEvaluator,
    converter: &'a dyn PropertyConverter,
    policy: ErrorPolicy,
    max_depth: usize,
}

impl<'a> Materializer<'a> {
    pub fn new(
        schema: &'a dyn SchemaProvider,
        expressions: &'a dyn ExpressionEvaluator,
        converter: &'a dyn PropertyConverter,
    ) -> Self {
        Self {
            schema,
            expressions,
            converter,
            policy: ErrorPolicy::default(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Set the continue/abort policy.
    pub fn with_policy(mut self, policy: ErrorPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Override the evaluator's recursion guard.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Materialize a parsed template configuration onto `target`.
    pub fn materialize(
        &self,
        graph: &mut ContentGraph,
        target: NodeId,
        config: &RawConfiguration,
        context: &EvaluationContext,
    ) -> Result<MaterializationReport, MaterializeError> {
        self.run(graph, target, config, context, ErrorSink::new())
    }

    /// Parse a YAML template and materialize it onto `target`. Structural
    /// errors below the root are captured into the same report; a structural
    /// error at the root is fatal.
    pub fn materialize_yaml(
        &self,
        graph: &mut ContentGraph,
        target: NodeId,
        yaml: &str,
        context: &EvaluationContext,
    ) -> Result<MaterializationReport, MaterializeError> {
        let mut sink = ErrorSink::new();
        let config = RawConfiguration::from_yaml_str(yaml, &mut sink)?;
        self.run(graph, target, &config, context, sink)
    }

    fn run(
        &self,
        graph: &mut ContentGraph,
        target: NodeId,
        config: &RawConfiguration,
        context: &EvaluationContext,
        mut sink: ErrorSink,
    ) -> Result<MaterializationReport, MaterializeError> {
        let Some(node) = graph.node(target) else {
            return Err(MaterializeError::unknown_target(target));
        };
        let root_type = node.type_name.clone();
        let label = graph.path(target).unwrap_or_else(|| target.to_string());

        let evaluator = TemplateEvaluator::new(self.expressions).with_max_depth(self.max_depth);
        let template = evaluator.evaluate(config, context, &mut sink);

        // The only point where the policy is consulted: errors captured up
        // to here (parsing and evaluation). Validation and planning errors
        // downgrade the outcome but never abort. Nothing has touched the
        // graph yet, so aborting leaves it exactly as it was.
        if self.policy.aborts(sink.len()) {
            warn!(target = %label, captured = sink.len(), "aborting, nothing applied");
            return Ok(MaterializationReport {
                target: label,
                outcome: Outcome::NotApplied,
                errors: sink.into_errors(),
                operations_applied: 0,
            });
        }

        let plan = {
            let planner = MaterializationPlanner::new(self.schema, self.converter, &*graph);
            planner.plan_root(&template, &root_type, &mut sink)
        };
        debug!(
            target = %label,
            root_type,
            operations = plan.len(),
            captured = sink.len(),
            "plan ready"
        );

        let applied = PlanExecutor::new(self.schema, graph).execute(&plan, target, &mut sink);

        let outcome = if sink.is_empty() {
            Outcome::Applied
        } else {
            Outcome::PartiallyApplied
        };
        Ok(MaterializationReport {
            target: label,
            outcome,
            errors: sink.into_errors(),
            operations_applied: applied,
        })
    }
}
