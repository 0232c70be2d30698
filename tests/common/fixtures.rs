//! Static journal corpora used across harnesses.
//!
//! Single-line corpora are `&'static [&'static str]` of records without
//! trailing newlines. Multi-line corpora carry their own newlines and
//! whitespace-indented continuation lines, since the indentation is exactly
//! what the segmenter keys off.

/// Single-line records in the shape `journalctl` prints them.
pub const CORPUS_SYSLOG: &[&str] = &[
    "Jan 15 10:00:00 web1 systemd[1]: Started Daily apt upgrade and clean activities.",
    "Jan 15 10:00:01 web1 sshd[4211]: Accepted publickey for deploy from 10.0.0.7 port 51622 ssh2",
    "Jan 15 10:00:02 web1 nginx[912]: 10.0.0.9 - - \"GET /healthz HTTP/1.1\" 200 2 \"-\" \"kube-probe/1.28\"",
    "Jan 15 10:00:03 web1 kernel: usb 1-1: new high-speed USB device number 4 using xhci_hcd",
    "Jan 15 10:00:04 web1 cron[233]: (root) CMD (run-parts /etc/cron.hourly)",
    "Jan 15 10:00:05 web1 app[1402]: ERROR request failed request_id=req-abc123 status=502",
    "Jan 15 10:00:06 web1 app[1402]: WARN retrying payment gateway attempt=2 max=3",
    "Jan 15 10:00:07 web1 sshd[4215]: Failed password for invalid user admin from 203.0.113.9 port 54321 ssh2",
];

/// Whole multi-line records: a header line plus indented continuations,
/// each record newline-terminated.
pub const CORPUS_TRACES: &[&str] = &[
    "Jan 15 10:01:00 web1 gunicorn[902]: Traceback (most recent call last):\n   File \"app.py\", line 42, in handle\n     return view(request)\n   File \"views.py\", line 17, in view\n     total = price * qty\n TypeError: unsupported operand type(s)\n",
    "Jan 15 10:01:05 web1 java[1212]: java.lang.NullPointerException: payment id was null\n\tat com.example.PaymentService.charge(PaymentService.java:88)\n\tat com.example.ApiHandler.post(ApiHandler.java:31)\n",
    "Jan 15 10:01:09 web1 app[1402]: panic: runtime error: index out of range [3] with length 3\n \n goroutine 1 [running]:\n main.pick(...)\n \t/srv/app/main.go:52\n",
];

/// Generate `n` single-line newline-terminated records for throughput and
/// backpressure tests. Every tenth record is an ERROR so include filters
/// have something to match.
pub fn corpus_high_volume(n: usize) -> String {
    let mut out = String::with_capacity(n * 64);
    for i in 0..n {
        let level = match i % 10 {
            0 => "ERROR",
            1 | 2 => "WARN",
            _ => "INFO",
        };
        out.push_str(&format!(
            "Jan 15 {:02}:{:02}:{:02} web1 app[1402]: {} synthetic record seq={}\n",
            i / 3600 % 24,
            i / 60 % 60,
            i % 60,
            level,
            i,
        ));
    }
    out
}
