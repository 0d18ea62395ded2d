//! Linear workflow execution engine.
//!
//! Executes a workflow's nodes strictly in list order with a fail-fast
//! policy: the first failed node terminates the run, later nodes are never
//! attempted and leave no trace. Every attempted node gets a trace with
//! size-capped input/output summaries, and token usage accumulates into the
//! run cost.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::{Map, Value};
use uuid::Uuid;

use toolflow_types::config::EngineConfig;
use toolflow_types::error::EngineError;
use toolflow_types::llm::TokenUsage;
use toolflow_types::run::{NodeTrace, RunCost, RunResult, RunStatus, TraceError, TraceStatus};
use toolflow_types::workflow::{FinalOutput, Node, Workflow};

use crate::file::FileStore;
use crate::llm::LlmClient;
use crate::store::RunStore;
use crate::tool::registry::ToolRegistry;
use crate::tool::ToolContext;
use crate::workflow::mapping::{get_by_path, MappingEvaluator};

/// The workflow execution engine.
///
/// Generic over the run store; the LLM client and file store are optional
/// and only required by tools that use them.
pub struct WorkflowEngine<R: RunStore> {
    registry: Arc<ToolRegistry>,
    config: Arc<EngineConfig>,
    runs: R,
    llm: Option<Arc<dyn LlmClient>>,
    files: Option<Arc<dyn FileStore>>,
}

impl<R: RunStore> WorkflowEngine<R> {
    pub fn new(registry: Arc<ToolRegistry>, config: Arc<EngineConfig>, runs: R) -> Self {
        Self {
            registry,
            config,
            runs,
            llm: None,
            files: None,
        }
    }

    pub fn with_llm(mut self, llm: Arc<dyn LlmClient>) -> Self {
        self.llm = Some(llm);
        self
    }

    pub fn with_files(mut self, files: Arc<dyn FileStore>) -> Self {
        self.files = Some(files);
        self
    }

    /// Execute a workflow run to completion.
    ///
    /// Node and tool failures never surface as `Err`; they finalize the run
    /// as `Failed` inside an `Ok(RunResult)`. `Err` is reserved for run
    /// record persistence failures.
    pub async fn execute(
        &self,
        run_id: Uuid,
        workflow: &Workflow,
        override_nodes: Option<&[Node]>,
    ) -> Result<RunResult, EngineError> {
        let nodes = override_nodes.unwrap_or(&workflow.nodes);

        tracing::info!(
            run_id = %run_id,
            workflow_id = %workflow.workflow_id,
            nodes = nodes.len(),
            "starting workflow run"
        );

        self.runs.update_run_status(&run_id, RunStatus::Running).await?;

        let mut node_outputs: HashMap<String, Map<String, Value>> = HashMap::new();
        let mut traces: Vec<NodeTrace> = Vec::new();
        let mut cost = RunCost::default();

        for node in nodes {
            let executed = self.execute_node(run_id, node, &node_outputs).await?;

            match executed {
                NodeExecution::Succeeded { trace, output, usage } => {
                    if let Some(usage) = usage {
                        cost.add(&usage);
                    }
                    node_outputs.insert(node.node_id.clone(), output);
                    traces.push(trace);
                }
                NodeExecution::Failed { trace } => {
                    let error = trace.error.clone();
                    traces.push(trace);

                    tracing::warn!(
                        run_id = %run_id,
                        node_id = node.node_id.as_str(),
                        "node failed, terminating run"
                    );
                    self.runs.update_run_status(&run_id, RunStatus::Failed).await?;

                    return Ok(RunResult {
                        status: RunStatus::Failed,
                        node_outputs,
                        final_output: None,
                        error,
                        traces,
                        cost,
                    });
                }
            }
        }

        let final_output = workflow
            .final_output
            .as_ref()
            .map(|cfg| map_final_output(cfg, &node_outputs));

        self.runs.update_run_status(&run_id, RunStatus::Success).await?;

        tracing::info!(
            run_id = %run_id,
            total_tokens = cost.total_tokens,
            "workflow run succeeded"
        );

        Ok(RunResult {
            status: RunStatus::Success,
            node_outputs,
            final_output,
            error: None,
            traces,
            cost,
        })
    }

    /// Execute one node and produce its terminal trace.
    ///
    /// Returns `Err` only when the trace cannot be persisted.
    async fn execute_node(
        &self,
        run_id: Uuid,
        node: &Node,
        node_outputs: &HashMap<String, Map<String, Value>>,
    ) -> Result<NodeExecution, EngineError> {
        let mut trace = NodeTrace::started(&node.node_id, &node.tool_id);
        self.runs.record_trace(&run_id, &trace).await?;

        match self.try_node(run_id, node, node_outputs).await {
            Ok((inputs, output, usage)) => {
                trace.status = TraceStatus::Success;
                trace.ended_at = Some(chrono::Utc::now());
                trace.input_summary = summarize(&inputs, self.config.summary_max_chars);
                trace.output_summary = summarize(&output, self.config.summary_max_chars);
                if let Some(usage) = &usage {
                    if let Ok(usage_json) = serde_json::to_value(usage) {
                        trace.output_summary.insert("token_usage".to_string(), usage_json);
                    }
                }
                self.runs.record_trace(&run_id, &trace).await?;
                Ok(NodeExecution::Succeeded { trace, output, usage })
            }
            Err(err) => {
                trace.status = TraceStatus::Failed;
                trace.ended_at = Some(chrono::Utc::now());
                trace.error = Some(TraceError::from(&err));
                self.runs.record_trace(&run_id, &trace).await?;
                Ok(NodeExecution::Failed { trace })
            }
        }
    }

    async fn try_node(
        &self,
        run_id: Uuid,
        node: &Node,
        node_outputs: &HashMap<String, Map<String, Value>>,
    ) -> Result<(Map<String, Value>, Map<String, Value>, Option<TokenUsage>), EngineError> {
        let tool = self.registry.get(&node.tool_id, Some(&node.version))?;

        let evaluator = MappingEvaluator::new(node_outputs);
        let inputs = evaluator.evaluate(&node.input_mapping, &node.node_id)?;

        let mut ctx = ToolContext::new(run_id, &node.node_id, Arc::clone(&self.config));
        if let Some(prompt) = &node.prompt {
            ctx = ctx.with_prompt(prompt.clone());
        }
        if let Some(llm) = &self.llm {
            ctx = ctx.with_llm(Arc::clone(llm));
        }
        if let Some(files) = &self.files {
            ctx = ctx.with_files(Arc::clone(files));
        }

        let output = tool.run(inputs.clone(), &ctx).await?;
        Ok((inputs, output.value, output.usage))
    }
}

// ---------------------------------------------------------------------------
// Summaries and final output
// ---------------------------------------------------------------------------

/// Produce a size-capped summary of an input/output object for traces.
///
/// Strings beyond `max_chars` are truncated with a `...` suffix; arrays and
/// objects are replaced by `<array len=N>` / `<object len=N>` tags; other
/// scalars pass through unchanged.
pub fn summarize(data: &Map<String, Value>, max_chars: usize) -> Map<String, Value> {
    let mut summary = Map::new();
    for (key, value) in data {
        let summarized = match value {
            Value::String(s) if s.chars().count() > max_chars => {
                let truncated: String = s.chars().take(max_chars).collect();
                Value::String(format!("{truncated}..."))
            }
            Value::Array(arr) => Value::String(format!("<array len={}>", arr.len())),
            Value::Object(obj) => Value::String(format!("<object len={}>", obj.len())),
            other => other.clone(),
        };
        summary.insert(key.clone(), summarized);
    }
    summary
}

/// Map the accumulated node outputs into the workflow's final output.
///
/// Best effort by design: keys whose node is missing or whose path does not
/// resolve are omitted, unlike node-input mapping which fails the run.
pub fn map_final_output(
    config: &FinalOutput,
    node_outputs: &HashMap<String, Map<String, Value>>,
) -> Map<String, Value> {
    let mut result = Map::new();
    for (key, output_ref) in &config.mapping {
        let Some(output) = node_outputs.get(&output_ref.node_id) else {
            continue;
        };
        match get_by_path(&Value::Object(output.clone()), &output_ref.path) {
            Some(value) if !value.is_null() => {
                result.insert(key.clone(), value);
            }
            _ => {}
        }
    }
    result
}

/// Outcome of one node attempt, carrying the full output on success.
enum NodeExecution {
    Succeeded {
        trace: NodeTrace,
        output: Map<String, Value>,
        usage: Option<TokenUsage>,
    },
    Failed {
        trace: NodeTrace,
    },
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
