//! Keyword-routed responses to OS questions.
//!
//! Queries are matched against [`CATEGORIES`] in priority order. A category
//! with secondary branches only answers when one of its branches also
//! matches; otherwise evaluation falls through to the next category, so
//! "cpu network" is answered by the network category and a bare "cpu" gets
//! the help text.

pub mod templates;

use crate::simulator::MetricsSnapshot;

/// The template a query resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    CpuStatus,
    CpuTheory,
    MemoryStatus,
    MemoryTheory,
    ProcessList,
    ProcessTheory,
    Disk,
    Network,
    Optimization,
    Scheduling,
    Deadlock,
    FileSystem,
}

impl Intent {
    pub fn render(self, snapshot: &MetricsSnapshot) -> String {
        match self {
            Self::CpuStatus => templates::cpu_status(snapshot),
            Self::CpuTheory => templates::cpu_theory(),
            Self::MemoryStatus => templates::memory_status(snapshot),
            Self::MemoryTheory => templates::memory_theory(),
            Self::ProcessList => templates::process_list(snapshot),
            Self::ProcessTheory => templates::process_theory(),
            Self::Disk => templates::disk(snapshot),
            Self::Network => templates::network(snapshot),
            Self::Optimization => templates::optimization(snapshot),
            Self::Scheduling => templates::scheduling(),
            Self::Deadlock => templates::deadlock(),
            Self::FileSystem => templates::file_system(),
        }
    }
}

/// Secondary keyword check inside a category.
pub struct Branch {
    pub keywords: &'static [&'static str],
    pub intent: Intent,
}

pub enum Dispatch {
    /// Answer as soon as the category keyword matches.
    Always(Intent),
    /// First matching branch answers; no match falls through.
    Branches(&'static [Branch]),
}

pub struct Category {
    pub name: &'static str,
    pub keywords: &'static [&'static str],
    pub dispatch: Dispatch,
}

const THEORY: &[&str] = &["explain", "what is"];
const STATUS: &[&str] = &["usage", "current"];

/// Categories in the order they are tried.
pub const CATEGORIES: &[Category] = &[
    Category {
        name: "cpu",
        keywords: &["cpu", "processor"],
        dispatch: Dispatch::Branches(&[
            Branch {
                keywords: STATUS,
                intent: Intent::CpuStatus,
            },
            Branch {
                keywords: THEORY,
                intent: Intent::CpuTheory,
            },
        ]),
    },
    Category {
        name: "memory",
        keywords: &["memory"],
        dispatch: Dispatch::Branches(&[
            Branch {
                keywords: STATUS,
                intent: Intent::MemoryStatus,
            },
            Branch {
                keywords: THEORY,
                intent: Intent::MemoryTheory,
            },
        ]),
    },
    Category {
        name: "process",
        keywords: &["process"],
        dispatch: Dispatch::Branches(&[
            Branch {
                keywords: &["list", "running", "show", "top"],
                intent: Intent::ProcessList,
            },
            Branch {
                keywords: THEORY,
                intent: Intent::ProcessTheory,
            },
        ]),
    },
    Category {
        name: "disk",
        keywords: &["disk", "storage"],
        dispatch: Dispatch::Always(Intent::Disk),
    },
    Category {
        name: "network",
        keywords: &["network", "bandwidth"],
        dispatch: Dispatch::Always(Intent::Network),
    },
    Category {
        name: "optimization",
        keywords: &["optimiz", "optimis", "performance", "speed up"],
        dispatch: Dispatch::Always(Intent::Optimization),
    },
    Category {
        name: "scheduling",
        keywords: &["schedul"],
        dispatch: Dispatch::Always(Intent::Scheduling),
    },
    Category {
        name: "deadlock",
        keywords: &["deadlock"],
        dispatch: Dispatch::Always(Intent::Deadlock),
    },
    Category {
        name: "filesystem",
        keywords: &["file system", "filesystem"],
        dispatch: Dispatch::Always(Intent::FileSystem),
    },
];

fn contains_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| text.contains(k))
}

pub struct QueryResponder;

impl QueryResponder {
    /// Resolve a query to an intent, or `None` for the help text.
    pub fn classify(query: &str) -> Option<Intent> {
        let text = query.to_lowercase();

        for category in CATEGORIES {
            if !contains_any(&text, category.keywords) {
                continue;
            }
            match &category.dispatch {
                Dispatch::Always(intent) => return Some(*intent),
                Dispatch::Branches(branches) => {
                    if let Some(branch) = branches.iter().find(|b| contains_any(&text, b.keywords)) {
                        return Some(branch.intent);
                    }
                    tracing::trace!(category = category.name, "no branch matched, falling through");
                }
            }
        }

        None
    }

    pub fn respond(query: &str, snapshot: &MetricsSnapshot) -> String {
        let intent = Self::classify(query);
        tracing::debug!(?intent, "classified query");
        match intent {
            Some(intent) => intent.render(snapshot),
            None => templates::HELP.to_string(),
        }
    }
}
