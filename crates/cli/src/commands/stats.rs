//! Store statistics command.

use shopdesk_admin::dashboard;
use shopdesk_admin::store::Collections;

use super::CommandError;

/// Show headline counts, revenue and monthly sales.
///
/// # Errors
///
/// Returns `CommandError::Store` if any read fails.
pub async fn show(collections: &Collections) -> Result<(), CommandError> {
    let (stats, sales) = tokio::try_join!(
        dashboard::load_stats(collections),
        dashboard::monthly_sales(collections),
    )?;

    for card in stats.cards() {
        tracing::info!("{:<16} {}", card.label, card.value);
    }

    if !sales.is_empty() {
        tracing::info!("");
        tracing::info!("Monthly sales:");
        for point in &sales {
            tracing::info!("  {} ({})  {}", point.label, point.month, point.revenue);
        }
    }
    Ok(())
}
