use asmakam_core::types::FeedbackId;
use asmakam_core::wizard::FeedbackWizard;

use crate::client::FeedbackClient;
use crate::error::ClientError;

/// Submit a wizard that is sitting on its comment step.
///
/// Moves the wizard to `Submitting`, posts the payload, then settles it in
/// `Success` (returning the new id) or `Error` (carrying the error text the
/// customer will see). A wizard that fails local validation is left where
/// it was.
pub async fn submit_wizard(
    wizard: &mut FeedbackWizard,
    client: &FeedbackClient,
) -> Result<FeedbackId, ClientError> {
    let payload = wizard.begin_submit()?;

    match client.submit(&payload).await {
        Ok(response) => {
            let id = response.data.id;
            tracing::info!(feedback_id = %id, "Feedback wizard submitted");
            wizard.complete(Ok(id.clone()))?;
            Ok(id)
        }
        Err(err) => {
            tracing::warn!(error = %err, "Feedback wizard submit failed");
            wizard.complete(Err(err.to_string()))?;
            Err(err)
        }
    }
}
