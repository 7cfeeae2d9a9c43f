// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sections for sweep.

pub mod cli;
pub mod log;
pub mod logging;
pub mod notice;
pub mod overdue;
pub mod schedule;
pub mod site;

pub use cli::{CliConfig, CliConfigLayer};
pub use log::{LogConfig, LogConfigLayer};
pub use logging::{LoggingConfig, LoggingConfigLayer};
pub use notice::{NoticeConfig, NoticeConfigLayer};
pub use overdue::{OverdueConfig, OverdueConfigLayer};
pub use schedule::{ScheduleConfig, ScheduleConfigLayer};
pub use site::{SiteConfig, SiteConfigLayer};
