use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use toaster::Result;
use toaster::event::{EventBus, SHOW_TOAST, ShowToast};
use tracing::{debug, warn};

/// Publish one `showToast` event per JSON line until EOF. Lines that are not
/// UTF-8 or not a valid payload are logged and skipped. Consumes the bus
/// handle so the bus closes once reading stops.
pub async fn feed_events<R>(mut reader: R, bus: EventBus) -> Result<usize>
where
    R: AsyncBufRead + Unpin,
{
    let mut buf = Vec::new();
    let mut published = 0;
    let mut line_no = 0_usize;

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).await? == 0 {
            break;
        }
        line_no += 1;

        let Ok(line) = std::str::from_utf8(&buf) else {
            warn!(line = line_no, "skipping line that is not valid UTF-8");
            continue;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match ShowToast::from_json(line) {
            Ok(Some(event)) => {
                debug!(line = line_no, level = %event.level, "publishing {SHOW_TOAST}");
                bus.publish(event);
                published += 1;
            }
            Ok(None) => debug!(line = line_no, "trigger without {SHOW_TOAST} ignored"),
            Err(err) => warn!(line = line_no, error = %err, "skipping payload"),
        }
    }

    debug!(published, "input closed");
    Ok(published)
}
