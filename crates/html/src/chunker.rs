//! Chunk plans for streaming tests.
//!
//! A [`ChunkPlan`] says where to cut an input before feeding it piece by
//! piece. Plans are deterministic (fixed sizes, cuts around markup) or
//! seeded, so a failing plan can be replayed and shrunk.

use std::fmt;

use core_types::NameTables;
use tools::Utf8Decoder;

use crate::tokenizer::{Token, Tokenizer, TokenizerConfig, WriteMode};

/// Default number of seeded plans per input.
pub const DEFAULT_FUZZ_RUNS: usize = 16;
/// Default seed for seeded plans.
pub const DEFAULT_FUZZ_SEED: u64 = 0x6b68_746d_6c00_0001;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BoundaryPolicy {
    /// Cuts only fall on `char` boundaries.
    Utf8Aligned,
    /// Cuts may split a multi-byte character; chunks go through a decoder.
    ByteStream,
}

impl fmt::Display for BoundaryPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryPolicy::Utf8Aligned => f.write_str("utf8"),
            BoundaryPolicy::ByteStream => f.write_str("bytes"),
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ChunkPlan {
    Fixed {
        size: usize,
        policy: BoundaryPolicy,
    },
    Boundaries {
        indices: Vec<usize>,
        policy: BoundaryPolicy,
    },
}

impl fmt::Display for ChunkPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChunkPlan::Fixed { size, policy } => write!(f, "fixed size={size} policy={policy}"),
            ChunkPlan::Boundaries { indices, policy } => write!(
                f,
                "boundaries count={} policy={policy} indices={indices:?}",
                indices.len()
            ),
        }
    }
}

impl ChunkPlan {
    pub fn fixed(size: usize) -> Self {
        Self::Fixed {
            size,
            policy: BoundaryPolicy::Utf8Aligned,
        }
    }

    pub fn fixed_unaligned(size: usize) -> Self {
        Self::Fixed {
            size,
            policy: BoundaryPolicy::ByteStream,
        }
    }

    pub fn boundaries(indices: impl Into<Vec<usize>>) -> Self {
        Self::Boundaries {
            indices: indices.into(),
            policy: BoundaryPolicy::Utf8Aligned,
        }
    }

    pub fn boundaries_unaligned(indices: impl Into<Vec<usize>>) -> Self {
        Self::Boundaries {
            indices: indices.into(),
            policy: BoundaryPolicy::ByteStream,
        }
    }

    pub fn policy(&self) -> BoundaryPolicy {
        match self {
            ChunkPlan::Fixed { policy, .. } | ChunkPlan::Boundaries { policy, .. } => *policy,
        }
    }

    /// Interior cut points for `input`, sorted and deduplicated.
    ///
    /// Under [`BoundaryPolicy::Utf8Aligned`], cuts inside a character are
    /// dropped.
    pub fn cut_points(&self, input: &str) -> Vec<usize> {
        let len = input.len();
        let mut points = match self {
            ChunkPlan::Fixed { size, .. } => {
                assert!(*size > 0, "chunk size must be > 0");
                (1..)
                    .map(|i| i * size)
                    .take_while(|&idx| idx < len)
                    .collect()
            }
            ChunkPlan::Boundaries { indices, .. } => indices.clone(),
        };
        points = filter_boundaries_by_policy(input, &points, self.policy());
        points.sort_unstable();
        points.dedup();
        points
    }

    /// Call `f` with each chunk of `input`, in order.
    pub fn for_each_chunk(&self, input: &str, mut f: impl FnMut(&[u8])) {
        let bytes = input.as_bytes();
        let mut last = 0usize;
        for idx in self.cut_points(input) {
            f(&bytes[last..idx]);
            last = idx;
        }
        if last < bytes.len() {
            f(&bytes[last..]);
        }
    }
}

/// A plan with a label for failure reports.
#[derive(Clone, Debug)]
pub struct ChunkPlanCase {
    pub label: String,
    pub plan: ChunkPlan,
}

/// Seeded-plan settings, read from `HTML_CHUNK_FUZZ_RUNS` and
/// `HTML_CHUNK_FUZZ_SEED` when set.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FuzzSettings {
    pub runs: usize,
    pub seed: u64,
}

impl Default for FuzzSettings {
    fn default() -> Self {
        Self {
            runs: DEFAULT_FUZZ_RUNS,
            seed: DEFAULT_FUZZ_SEED,
        }
    }
}

impl FuzzSettings {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let runs = std::env::var("HTML_CHUNK_FUZZ_RUNS")
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or(defaults.runs);
        let seed = std::env::var("HTML_CHUNK_FUZZ_SEED")
            .ok()
            .and_then(|value| parse_seed(&value))
            .unwrap_or(defaults.seed);
        Self { runs, seed }
    }
}

fn parse_seed(value: &str) -> Option<u64> {
    match value.strip_prefix("0x") {
        Some(hex) => u64::from_str_radix(hex, 16).ok(),
        None => value.parse().ok(),
    }
}

/// Deterministic plans plus `settings.runs` seeded plans for `input`.
///
/// Deterministic plans use fixed sizes and cuts on both sides of `<`, `>`,
/// `&`, `;` and quotes.
pub fn build_chunk_plans(
    input: &str,
    settings: FuzzSettings,
    policy: BoundaryPolicy,
) -> Vec<ChunkPlanCase> {
    let mut plans = Vec::new();
    for size in [1usize, 2, 3, 4, 7, 16, 64] {
        let plan = match policy {
            BoundaryPolicy::Utf8Aligned => ChunkPlan::fixed(size),
            BoundaryPolicy::ByteStream => ChunkPlan::fixed_unaligned(size),
        };
        plans.push(ChunkPlanCase {
            label: format!("fixed size={size}"),
            plan,
        });
    }

    let markup = markup_boundaries(input, policy);
    if !markup.is_empty() {
        plans.push(ChunkPlanCase {
            label: format!("markup-boundaries count={}", markup.len()),
            plan: ChunkPlan::Boundaries {
                indices: markup.clone(),
                policy,
            },
        });
    }

    let mut candidates = char_boundaries(input, policy);
    candidates.extend(markup);
    candidates.sort_unstable();
    candidates.dedup();
    for i in 0..settings.runs {
        let seed = settings.seed.wrapping_add(i as u64);
        let mut rng = Lcg::new(seed);
        let mut picks = candidates.clone();
        rng.shuffle(&mut picks);
        let count = 1 + rng.gen_range(picks.len().clamp(1, 32));
        picks.truncate(count);
        picks.sort_unstable();
        plans.push(ChunkPlanCase {
            label: format!("fuzz seed=0x{seed:016x}"),
            plan: ChunkPlan::Boundaries {
                indices: picks,
                policy,
            },
        });
    }
    plans
}

/// Tokenize `input` fed according to `plan`.
///
/// Byte-stream plans go through a [`Utf8Decoder`] so split characters are
/// reassembled.
pub fn tokenize_chunked(
    names: &NameTables,
    config: TokenizerConfig,
    input: &str,
    plan: &ChunkPlan,
) -> Vec<Token> {
    let mut tokenizer = Tokenizer::new(config, names.clone());
    let mut decoder = Utf8Decoder::new();
    let mut tokens = Vec::new();
    plan.for_each_chunk(input, |chunk| {
        let text = decoder.decode(chunk);
        tokenizer.write(&text, WriteMode::Append);
        tokens.extend(tokenizer.drain());
    });
    let mut tail = String::new();
    decoder.finish(&mut tail);
    tokenizer.write(&tail, WriteMode::Append);
    tokenizer.finish();
    tokens.extend(tokenizer.drain());
    tokens
}

/// Statistics from [`shrink_chunk_plan_with_stats`].
#[derive(Clone, Copy, Debug)]
pub struct ShrinkStats {
    pub original_boundaries: usize,
    pub minimized_boundaries: usize,
    pub checks: usize,
    pub policy_upgraded: bool,
    pub budget_exhausted: bool,
}

/// Remove cut points from a failing plan while it keeps failing.
///
/// `fails` must be deterministic. A byte-stream plan is switched to aligned
/// cuts when the failure survives it.
pub fn shrink_chunk_plan_with_stats(
    input: &str,
    plan: &ChunkPlan,
    mut fails: impl FnMut(&ChunkPlan) -> bool,
) -> (ChunkPlan, ShrinkStats) {
    let mut policy = plan.policy();
    let mut boundaries = plan.cut_points(input);
    let original_boundaries = boundaries.len();
    let max_checks = shrink_budget();
    let mut checks = 0usize;
    let mut budget_exhausted = false;
    let mut policy_upgraded = false;

    let mut changed = true;
    'outer: while changed {
        changed = false;
        let mut i = 0usize;
        while i < boundaries.len() {
            if checks >= max_checks {
                budget_exhausted = true;
                break 'outer;
            }
            checks += 1;
            let mut candidate = boundaries.clone();
            candidate.remove(i);
            if fails(&ChunkPlan::Boundaries {
                indices: candidate.clone(),
                policy,
            }) {
                boundaries = candidate;
                changed = true;
            } else {
                i += 1;
            }
        }
    }

    if !budget_exhausted && policy == BoundaryPolicy::ByteStream {
        let aligned = filter_boundaries_by_policy(input, &boundaries, BoundaryPolicy::Utf8Aligned);
        checks += 1;
        if fails(&ChunkPlan::boundaries(aligned.clone())) {
            boundaries = aligned;
            policy = BoundaryPolicy::Utf8Aligned;
            policy_upgraded = true;
        }
    }

    let stats = ShrinkStats {
        original_boundaries,
        minimized_boundaries: boundaries.len(),
        checks,
        policy_upgraded,
        budget_exhausted,
    };
    (
        ChunkPlan::Boundaries {
            indices: boundaries,
            policy,
        },
        stats,
    )
}

pub fn shrink_chunk_plan(
    input: &str,
    plan: &ChunkPlan,
    fails: impl FnMut(&ChunkPlan) -> bool,
) -> ChunkPlan {
    shrink_chunk_plan_with_stats(input, plan, fails).0
}

fn shrink_budget() -> usize {
    if std::env::var("CI").is_ok() {
        1_000
    } else {
        10_000
    }
}

fn filter_boundaries_by_policy(input: &str, indices: &[usize], policy: BoundaryPolicy) -> Vec<usize> {
    indices
        .iter()
        .copied()
        .filter(|&idx| idx > 0 && idx < input.len())
        .filter(|&idx| policy == BoundaryPolicy::ByteStream || input.is_char_boundary(idx))
        .collect()
}

fn markup_boundaries(input: &str, policy: BoundaryPolicy) -> Vec<usize> {
    let mut out = Vec::new();
    for (i, b) in input.bytes().enumerate() {
        if matches!(b, b'<' | b'>' | b'&' | b';' | b'"' | b'\'') {
            out.push(i);
            out.push(i + 1);
        }
    }
    let mut out = filter_boundaries_by_policy(input, &out, policy);
    out.sort_unstable();
    out.dedup();
    out
}

fn char_boundaries(input: &str, policy: BoundaryPolicy) -> Vec<usize> {
    match policy {
        BoundaryPolicy::Utf8Aligned => input.char_indices().map(|(idx, _)| idx).skip(1).collect(),
        BoundaryPolicy::ByteStream => (1..input.len()).collect(),
    }
}

struct Lcg {
    state: u64,
}

impl Lcg {
    fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.state
    }

    fn gen_range(&mut self, upper: usize) -> usize {
        if upper == 0 {
            return 0;
        }
        (self.next_u64() >> 32) as usize % upper
    }

    fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.gen_range(i + 1);
            items.swap(i, j);
        }
    }
}
