//! Synthesized panel data for running without a NeonPanel account.
//!
//! Stats are random on every call, user records are derived from a hash of the
//! user id so repeated lookups agree, and search runs over a fixed catalog.
use chrono::{Duration, NaiveDate};
use rand::Rng;
use serde_json::{json, Value};
use sha2::{Digest, Sha256};

use super::{Record, ServerAction};

const PLANS: [&str; 4] = ["free", "starter", "pro", "enterprise"];
const ACCOUNT_STATES: [&str; 4] = ["active", "active", "active", "suspended"];

/// (name, kind, status, region)
const CATALOG: [(&str, &str, &str, &str); 10] = [
    ("web-server-01", "server", "running", "us-east-1"),
    ("web-server-02", "server", "running", "us-west-2"),
    ("staging-server", "server", "stopped", "eu-west-1"),
    ("db-primary", "database", "running", "us-east-1"),
    ("db-replica", "database", "running", "eu-west-1"),
    ("analytics-warehouse", "database", "running", "us-west-2"),
    ("cache-redis", "cache", "running", "us-east-1"),
    ("backup-storage", "storage", "available", "us-west-2"),
    ("load-balancer-main", "load_balancer", "active", "us-east-1"),
    ("mail-relay", "service", "degraded", "eu-west-1"),
];

fn record(value: Value) -> Record {
    match value {
        Value::Object(map) => map,
        _ => Record::new(),
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

pub fn server_stats<R: Rng + ?Sized>(rng: &mut R) -> Record {
    let total: u32 = rng.gen_range(8..=40);
    let active: u32 = rng.gen_range(total / 2..=total);

    record(json!({
        "total_servers": total,
        "active_servers": active,
        "avg_cpu_usage": round1(rng.gen_range(15.0..85.0)),
        "avg_memory_usage": round1(rng.gen_range(30.0..90.0)),
        "servers_change": rng.gen_range(-2..=3),
        "active_change": rng.gen_range(-3..=3),
        "cpu_change": round1(rng.gen_range(-5.0..5.0)),
        "memory_change": round1(rng.gen_range(-5.0..5.0)),
        "demo_mode": true,
    }))
}

pub fn user_record(user_id: &str) -> Record {
    let digest = Sha256::digest(user_id.as_bytes());
    let tag: String = digest[..3].iter().map(|b| format!("{:02x}", b)).collect();
    let handle: String = user_id
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_lowercase();
    let handle = if handle.is_empty() {
        format!("user{}", tag)
    } else {
        handle
    };

    let age_days = u16::from_be_bytes([digest[3], digest[4]]) % 700;
    let created_at = NaiveDate::from_ymd_opt(2023, 1, 1)
        .map(|start| start + Duration::days(i64::from(age_days)))
        .map(|date| date.to_string())
        .unwrap_or_default();

    record(json!({
        "id": user_id,
        "name": format!("Demo User {}", tag.to_uppercase()),
        "email": format!("{}@demo.neonpanel.com", handle),
        "plan": PLANS[usize::from(digest[5]) % PLANS.len()],
        "status": ACCOUNT_STATES[usize::from(digest[6]) % ACCOUNT_STATES.len()],
        "servers": digest[7] % 12,
        "created_at": created_at,
        "demo_mode": true,
    }))
}

/// Catalog entries whose name contains `query`, ignoring case
pub fn search(query: &str) -> Vec<Record> {
    let needle = query.to_lowercase();
    CATALOG
        .iter()
        .enumerate()
        .filter(|(_, (name, ..))| name.to_lowercase().contains(&needle))
        .map(|(index, (name, kind, status, region))| {
            record(json!({
                "id": format!("res-{:03}", index + 1),
                "name": name,
                "type": kind,
                "status": status,
                "region": region,
            }))
        })
        .collect()
}

pub fn server_action(server_id: &str, action: ServerAction) -> Record {
    record(json!({
        "server_id": server_id,
        "action": action,
        "status": "completed",
        "message": format!("{} requested for server {}", action, server_id),
        "demo_mode": true,
    }))
}
