//! Concurrent per-party share encryption.
//!
//! The three encryptions share no state, so each runs on its own blocking
//! task. The join succeeds only when all three do.

use futures::future::try_join_all;
use zeroize::Zeroizing;
use crate::crypto::share_encrypt::encrypt_for_party;
use crate::crypto::PrimitiveProvider;
use crate::entropy::EntropySource;
use super::{AnalysisRequest, ClientError, EncryptedShares, MpcClient};

impl<P> MpcClient<P>
where
    P: PrimitiveProvider + Clone + Send + Sync + 'static,
{
    /// Same result as [`MpcClient::split_and_encrypt`], with the per-party
    /// encryptions issued concurrently.
    ///
    /// Randomness is drawn before the first suspension point. If any task
    /// fails or is cancelled, the whole operation fails.
    pub async fn split_and_encrypt_concurrent<R: EntropySource + ?Sized>(
        &self,
        rng: &mut R,
        request: &AnalysisRequest,
    ) -> Result<EncryptedShares, ClientError> {
        let (context, shares) = self.prepare(rng, request)?;

        let tasks = shares.iter().zip(request.parties.iter()).map(|(share, party)| {
            let provider = self.provider.clone();
            let value = Zeroizing::new(share.value().to_vec());
            let party = party.clone();
            let context = context.clone();
            tokio::task::spawn_blocking(move || encrypt_for_party(&provider, &value, &party, &context))
        });

        let joined = try_join_all(tasks).await.map_err(|e| {
            log::warn!("Share encryption task did not complete: {}", e);
            ClientError::TaskFailed(e.to_string())
        })?;
        let ciphertexts = joined.into_iter().collect::<Result<Vec<_>, _>>()?;

        log::info!(
            "Distributed {}-byte shares concurrently for analysis '{}'",
            shares.share_len(),
            request.analysis_type
        );
        <EncryptedShares>::try_from(ciphertexts)
            .map_err(|v| ClientError::TaskFailed(format!("expected 3 ciphertexts, got {}", v.len())))
    }
}
