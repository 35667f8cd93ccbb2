use tracing::{Event, Subscriber};
use tracing_subscriber::{
    fmt::{
        self,
        format::{Format, FormatEvent, FormatFields, Full, Writer},
        FmtContext,
    },
    registry::LookupSpan,
};

/// Indents each event by the depth of its span scope, so the login, pagination
/// and extraction steps read as a tree.
pub struct PrettyFormatter {
    inner: Format<Full, ()>,
    timestamps: bool,
}

impl PrettyFormatter {
    pub fn new(ansi: bool) -> Self {
        Self {
            inner: fmt::format()
                .with_ansi(ansi)
                .with_target(false)
                .with_file(false)
                .with_line_number(false)
                .with_level(true)
                .without_time(),
            timestamps: !ansi,
        }
    }
}

impl<S, N> FormatEvent<S, N> for PrettyFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'writer> FormatFields<'writer> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        // File output gets wall-clock time, the terminal stays compact.
        if self.timestamps {
            write!(writer, "{} ", chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"))?;
        }

        let depth = ctx.event_scope().map(|scope| scope.count()).unwrap_or(0);
        for _ in 1..depth {
            write!(writer, "  ")?;
        }
        if depth > 0 {
            write!(writer, "└─ ")?;
        }

        self.inner.format_event(ctx, writer, event)
    }
}
