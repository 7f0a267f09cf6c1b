// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Vector helpers for embedding storage and similarity ranking.

use mnemo_core::{MemoryRecord, RankedRecord};

/// Convert f32 vector to bytes for SQLite BLOB storage.
pub fn vec_to_blob(vec: &[f32]) -> Vec<u8> {
    vec.iter().flat_map(|f| f.to_le_bytes()).collect()
}

/// Convert SQLite BLOB back to f32 vector. Trailing partial chunks are ignored.
pub fn blob_to_vec(blob: &[u8]) -> Vec<f32> {
    blob.chunks_exact(4)
        .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect()
}

/// Cosine similarity between two vectors.
///
/// Returns `None` when the lengths differ or either vector has zero norm;
/// such pairs cannot be compared and are left out of ranked results.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Option<f32> {
    if a.len() != b.len() || a.is_empty() {
        return None;
    }
    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;
    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return None;
    }
    Some(dot / (norm_a.sqrt() * norm_b.sqrt()))
}

/// Score `candidates` against `query`, keep those at or above `threshold`,
/// and return the best `limit` in descending score order.
pub fn rank_candidates(
    candidates: Vec<MemoryRecord>,
    query: &[f32],
    threshold: f32,
    limit: usize,
) -> Vec<RankedRecord> {
    let mut ranked: Vec<RankedRecord> = candidates
        .into_iter()
        .filter_map(|record| {
            let score = cosine_similarity(record.embedding.as_deref()?, query)?;
            (score >= threshold).then_some(RankedRecord {
                record,
                score: Some(score),
            })
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    ranked.truncate(limit);
    ranked
}
