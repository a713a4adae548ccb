use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::watch;
use toaster::Result;
use toaster::controller::ToastView;

/// Write every view change as one JSON line (`null` once the toast is gone).
/// Returns when the publishing side is dropped.
pub async fn render_views<W>(
    mut views: watch::Receiver<Option<ToastView>>,
    mut out: W,
) -> Result<usize>
where
    W: AsyncWrite + Unpin,
{
    let mut rendered = 0;
    while views.changed().await.is_ok() {
        let mut line = serde_json::to_string(&*views.borrow_and_update())?;
        line.push('\n');
        out.write_all(line.as_bytes()).await?;
        out.flush().await?;
        rendered += 1;
    }
    Ok(rendered)
}
