use crate::stream::PosteriorStep;

/// Console block for one processed record: the raw data, the observed
/// binomial likelihood m/N and the posterior status, followed by a blank line.
pub fn record_block(step: &PosteriorStep) -> String {
    format!(
        "Data: {}\n[+] Binomial likelihood: {}/{}\n\n{}\n",
        step.record,
        step.record.successes(),
        step.record.trials(),
        step.posterior.status_report()
    )
}
