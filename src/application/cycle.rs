//! # Completion Cycle
//!
//! One user turn: ask the model with the tool catalog, run whatever tools it
//! requests against the session, then ask again with tools disallowed to get
//! the final answer.
//!
//! Tool calls run strictly one after another, in the order the model listed
//! them. The first failure aborts the turn; nothing is retried.

use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::application::catalog::fetch_catalog;
use crate::application::context::ChatContext;
use crate::domain::error::BridgeError;
use crate::domain::traits::ToolSession;
use crate::domain::types::{
    CompletionRequest, Message, ToolChoice, ToolInvocationRequest, ToolInvocationResult,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleState {
    AwaitingFirstResponse,
    AwaitingFinalResponse,
}

/// Run one completion cycle for `input` and return the answer to show.
pub async fn run_cycle(ctx: &mut ChatContext, input: &str) -> Result<String, BridgeError> {
    ctx.transcript.append(Message::user(input));
    let checkpoint = ctx.transcript.len();

    let tools = fetch_catalog(ctx.session.as_ref()).await?;

    let mut state = CycleState::AwaitingFirstResponse;
    debug!(?state, tools = tools.len(), "requesting completion");

    let reply = ctx
        .provider
        .complete(CompletionRequest {
            model: ctx.model.clone(),
            messages: ctx.transcript.window(ctx.history_window).to_vec(),
            tools: tools.clone(),
            tool_choice: ToolChoice::Auto,
        })
        .await?;

    // Tool calls stay out of the stored transcript; only the text is kept.
    ctx.transcript
        .append(Message::assistant(reply.content.clone().unwrap_or_default()));

    if reply.tool_calls.is_empty() {
        return Ok(reply.content.unwrap_or_default());
    }

    // The follow-up always carries the pinned system message, this turn's
    // user message and the whole exchange (assistant message plus one result
    // per call). Older history fills whatever room is left.
    let exchange_len = 1 + reply.tool_calls.len();
    let needed = ctx.transcript.pinned_len() + 1 + exchange_len;
    if needed > ctx.history_window {
        return Err(BridgeError::WindowExceeded {
            needed,
            bound: ctx.history_window,
        });
    }

    let results = invoke_tools(ctx.session.as_ref(), &reply.tool_calls).await?;

    state = CycleState::AwaitingFinalResponse;
    debug!(?state, results = results.len(), "requesting final completion");

    let history_budget = ctx.history_window - exchange_len;
    let mut messages = ctx
        .transcript
        .window_until(checkpoint, history_budget)
        .to_vec();
    messages.push(Message::assistant_with_calls(reply.content, reply.tool_calls));
    messages.extend(results.iter().map(Message::tool_result));

    let final_reply = ctx
        .provider
        .complete(CompletionRequest {
            model: ctx.model.clone(),
            messages,
            tools,
            tool_choice: ToolChoice::None,
        })
        .await?;

    let answer = final_reply.content.unwrap_or_default();
    ctx.transcript.append(Message::assistant(answer.clone()));
    Ok(answer)
}

/// Execute each requested call in order, one result per request.
async fn invoke_tools(
    session: &dyn ToolSession,
    calls: &[ToolInvocationRequest],
) -> Result<Vec<ToolInvocationResult>, BridgeError> {
    let mut results = Vec::with_capacity(calls.len());

    for call in calls {
        let arguments = parse_arguments(call)?;
        info!(tool = %call.tool_name, call_id = %call.call_id, "invoking tool");

        let output = session.call_tool(&call.tool_name, arguments).await?;
        if output.is_error {
            return Err(BridgeError::ToolInvocation {
                tool: call.tool_name.clone(),
                message: output.into_content(),
            });
        }

        results.push(ToolInvocationResult {
            call_id: call.call_id.clone(),
            content: output.into_content(),
        });
    }

    Ok(results)
}

/// Parse the model's raw argument payload. Blank or `null` means no arguments.
pub fn parse_arguments(call: &ToolInvocationRequest) -> Result<Map<String, Value>, BridgeError> {
    if call.arguments.trim().is_empty() {
        return Ok(Map::new());
    }

    serde_json::from_str::<Option<Map<String, Value>>>(&call.arguments)
        .map(Option::unwrap_or_default)
        .map_err(|source| BridgeError::MalformedArguments {
            tool: call.tool_name.clone(),
            source,
        })
}
