// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Active Probe Suite
 * XSS, TLS/certificate and script-hygiene probes
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

pub mod script;
pub mod tls;
pub mod xss;

use std::time::Duration;

/// Page fetch and TLS handshake budget.
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(10);

/// Budget per active reflection test.
pub const REFLECTION_TIMEOUT: Duration = Duration::from_secs(5);

/// Harmless marker payload used for reflection tests. It never executes on a
/// sane page; the probe only checks whether the server echoes it verbatim.
pub const XSS_TEST_PAYLOAD: &str = "<svg/onload=alert('XSS_')>";
