//! Research job commands.

use std::time::Duration;

use anyhow::{Context, Result, bail};
use serde_json::{Value, json};

/// Poll interval for `logs --follow`.
const FOLLOW_INTERVAL: Duration = Duration::from_secs(2);

pub async fn start(
    api_url: &str,
    domain: &str,
    focus: Option<String>,
    model: Option<String>,
) -> Result<()> {
    let mut request = json!({ "domain": domain });
    if let Some(focus) = focus {
        request["research_focus"] = json!(focus);
    }
    if let Some(model) = model {
        request["model_preference"] = json!(model);
    }

    let body = post_json(&format!("{api_url}/api/research/start"), &request).await?;
    println!("{}", body["message"].as_str().unwrap_or("started"));
    println!("job id: {}", body["job_id"].as_str().unwrap_or_default());
    Ok(())
}

pub async fn status(api_url: &str, id: &str) -> Result<()> {
    let body = get_json(&format!("{api_url}/api/research/{id}/status")).await?;
    println!("status:   {}", body["status"].as_str().unwrap_or("unknown"));
    println!(
        "stage:    {}",
        body["current_stage"].as_str().unwrap_or("unknown")
    );
    println!(
        "progress: {:.0}%",
        body["progress"].as_f64().unwrap_or(0.0) * 100.0
    );
    Ok(())
}

pub async fn logs(api_url: &str, id: &str, follow: bool) -> Result<()> {
    // the cursor is the sequence number of the last structured entry seen,
    // so a poll only ever prints new lines
    let mut cursor = 0u64;
    loop {
        let body =
            get_json(&format!("{api_url}/api/research/{id}/logs?last_seen={cursor}")).await?;

        for line in body["logs"].as_array().into_iter().flatten() {
            if let Some(line) = line.as_str() {
                println!("{line}");
            }
        }
        if let Some(last) = body["structured_logs"].as_array().and_then(|a| a.last()) {
            cursor = last["sequence_number"].as_u64().unwrap_or(cursor);
        }

        let job_status = body["job_status"].as_str().unwrap_or_default();
        if !follow || job_status == "completed" || job_status == "error" {
            break;
        }
        tokio::time::sleep(FOLLOW_INTERVAL).await;
    }
    Ok(())
}

pub async fn results(api_url: &str, id: &str) -> Result<()> {
    let body = get_json(&format!("{api_url}/api/research/{id}/results")).await?;
    println!("{}", serde_json::to_string_pretty(&body)?);
    Ok(())
}

pub async fn paper(api_url: &str, id: &str, output: &str) -> Result<()> {
    let response = reqwest::get(format!("{api_url}/api/research/{id}/paper"))
        .await
        .context("request failed")?;
    let status = response.status();
    if !status.is_success() {
        bail!("server returned {status}");
    }
    let bytes = response.bytes().await.context("reading response failed")?;
    tokio::fs::write(output, &bytes)
        .await
        .with_context(|| format!("writing {output} failed"))?;
    println!("wrote {output}");
    Ok(())
}

async fn get_json(url: &str) -> Result<Value> {
    let response = reqwest::get(url).await.context("request failed")?;
    parse_response(response).await
}

async fn post_json(url: &str, request: &Value) -> Result<Value> {
    let client = reqwest::Client::new();
    let response = client
        .post(url)
        .json(request)
        .send()
        .await
        .context("request failed")?;
    parse_response(response).await
}

async fn parse_response(response: reqwest::Response) -> Result<Value> {
    let status = response.status();
    let body: Value = response.json().await.context("invalid JSON response")?;
    if !status.is_success() {
        bail!(
            "server returned {status}: {}",
            body["error"].as_str().unwrap_or("unknown error")
        );
    }
    Ok(body)
}
