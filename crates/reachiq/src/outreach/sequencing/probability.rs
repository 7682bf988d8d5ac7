use super::channels::ChannelModel;
use super::domain::SequenceStep;
use super::policy::DecayModel;

/// Expand the channel model into `total_steps` decayed steps. `decay` is the
/// curve already resolved for the lead.
///
/// A channel with zero effectiveness simply yields a zero probability.
pub(crate) fn build_steps(
    model: &ChannelModel,
    total_steps: usize,
    decay: &DecayModel,
) -> Vec<SequenceStep> {
    (1..=total_steps)
        .map(|step| {
            let (channel, step_type) = model.channel_for_step(step);
            let base_probability = channel.effectiveness.clamp(0.0, 1.0);
            let decay_factor = decay.factor(step);
            let decay_adjusted = (base_probability * decay_factor).clamp(0.0, 1.0);

            SequenceStep {
                step,
                channel: channel.name.clone(),
                display_name: format!("{} {}", channel.name, step_type.label()),
                step_type,
                is_primary_channel: channel.name == model.primary().name,
                base_probability,
                decay_factor,
                decay_adjusted,
                channel_effectiveness: channel.effectiveness,
                probability: decay_adjusted,
            }
        })
        .collect()
}
