// src/server/handlers.rs

use axum::Json;
use axum::extract::{Query, State};
use serde_json::{Value, json};
use tracing::info;
use uuid::Uuid;

use super::AppState;
use super::types::{ChatRequest, ChatResponse, ProductListParams, ProductTypeInfo};
use crate::dialogue::{ChatTurn, TurnStage, TypeResolution};
use crate::error::{TellerError, TellerResult};
use crate::products::{ProductPage, ProductType, RateSort};

pub async fn status_handler() -> Json<Value> {
    Json(json!({
        "status": "running",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

pub async fn product_types_handler() -> Json<Vec<ProductTypeInfo>> {
    let types = ProductType::ALL
        .iter()
        .map(|pt| ProductTypeInfo {
            id: pt.as_str(),
            label: pt.label(),
        })
        .collect();
    Json(types)
}

pub async fn products_handler(
    State(state): State<AppState>,
    Query(params): Query<ProductListParams>,
) -> TellerResult<Json<ProductPage>> {
    let product_type = ProductType::parse(&params.product_type)
        .ok_or_else(|| TellerError::invalid_request("unknown product_type"))?;

    let sort = match params.sort.as_deref() {
        Some("rate_asc") => Some(RateSort::Asc),
        Some("rate_desc") => Some(RateSort::Desc),
        _ => None,
    };

    let page = state
        .products
        .list_page(
            product_type,
            params.page,
            params.page_size,
            sort,
            params.q.as_deref().unwrap_or(""),
        )
        .await?;

    Ok(Json(page))
}

/// One user message in, one stage result out.
///
/// Turns for a session are serialized behind its lock, and the stored
/// snapshot is only replaced after the whole turn succeeds - a collaborator
/// outage mid-turn leaves the session exactly as it was, so the client can
/// simply retry the same message.
pub async fn chat_handler(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> TellerResult<Json<ChatResponse>> {
    let message = request.message.trim().to_string();
    if message.is_empty() {
        return Err(TellerError::invalid_request("message must not be empty"));
    }

    let session_id = request
        .session_id
        .filter(|id| !id.trim().is_empty())
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let lock = state.locks.get_lock(&session_id).await;
    let _guard = lock.lock().await;

    let mut snapshot = state.sessions.get(&session_id).await;

    // First stage: fix the product type before anything else.
    if snapshot.state.product_type.is_none() {
        match state
            .orchestrator
            .resolve_product_type(&message, &snapshot.history)
            .await?
        {
            TypeResolution::Ask { question } => {
                snapshot.history.push(ChatTurn::user(&message));
                snapshot.history.push(ChatTurn::assistant(&question));
                state.sessions.put(&session_id, snapshot).await;
                return Ok(Json(ChatResponse {
                    session_id,
                    stage: "ask".to_string(),
                    reply: question,
                    recommendation: None,
                }));
            }
            TypeResolution::Resolved { product_type } => {
                info!("session {}: product type fixed to {}", session_id, product_type);
                snapshot.state.product_type = Some(product_type);
            }
        }
    }

    let mut working = snapshot.state.clone();
    let stage = state
        .orchestrator
        .advance_turn(&mut working, &message, &snapshot.history)
        .await?;

    let (stage_name, reply, recommendation) = render_stage(&stage);

    snapshot.state = working;
    snapshot.history.push(ChatTurn::user(&message));
    snapshot.history.push(ChatTurn::assistant(&reply));
    state.sessions.put(&session_id, snapshot).await;

    Ok(Json(ChatResponse {
        session_id,
        stage: stage_name.to_string(),
        reply,
        recommendation,
    }))
}

fn render_stage(stage: &TurnStage) -> (&'static str, String, Option<crate::dialogue::Recommendation>) {
    match stage {
        TurnStage::Ask { question } => {
            let preface = question
                .preface
                .clone()
                .unwrap_or_else(|| "One quick check:".to_string());
            ("ask", format!("{}\n{}", preface, question.text), None)
        }
        TurnStage::Draft {
            preface,
            candidates_text,
            next_question,
            ..
        } => {
            let reply = match next_question {
                Some(q) => {
                    let qpref = q
                        .preface
                        .clone()
                        .unwrap_or_else(|| "To sharpen these, one more thing:".to_string());
                    format!("{preface}\n\n{candidates_text}\n\n{qpref}\n{}", q.text)
                }
                None => format!("{preface}\n\n{candidates_text}"),
            };
            ("draft", reply, None)
        }
        TurnStage::Final { recommendation } => {
            let lines: Vec<String> = recommendation
                .products
                .iter()
                .enumerate()
                .map(|(i, p)| {
                    format!(
                        "{}. {} - {} (rate: {:.2}%) | {}",
                        i + 1,
                        p.provider,
                        p.name,
                        p.rate,
                        p.condition_summary
                    )
                })
                .collect();
            let reply = format!(
                "{}\n\n{}\n\n{}",
                recommendation.reason,
                lines.join("\n"),
                recommendation.notes
            );
            ("final", reply, Some(recommendation.clone()))
        }
    }
}
