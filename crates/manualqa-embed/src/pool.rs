use anyhow::Result;
use candle_core::{DType, Tensor};

/// Mean of the unmasked token states, `[B,T,H]` + `[B,T]` -> `[B,H]`.
fn masked_mean(hidden: &Tensor, attention_mask: &Tensor) -> Result<Tensor> {
    let dims = hidden.dims();
    assert_eq!(dims.len(), 3, "hidden shape must be [B,T,H]");
    let hidden_size = dims[2];

    let mask = attention_mask.to_device(hidden.device())?.to_dtype(hidden.dtype())?;
    let mask_3d = mask.unsqueeze(2)?;
    let mask_3d = match mask_3d.broadcast_as(hidden.shape()) {
        Ok(broadcast) => broadcast,
        Err(_) => mask_3d.repeat((1, 1, hidden_size))?,
    };
    let summed = (hidden * &mask_3d)?.sum(1)?;
    let token_counts = mask.sum(1)?.unsqueeze(1)?.to_dtype(summed.dtype())?;
    Ok(summed.broadcast_div(&token_counts)?)
}

/// Row-wise L2 normalization. The epsilon keeps all-zero rows finite and
/// is sized to the dtype's precision.
fn l2_normalize(v: &Tensor) -> Result<Tensor> {
    let eps_val = match v.dtype() {
        DType::F16 => 1e-6f32,
        _ => 1e-12f32,
    };
    let eps = Tensor::new(&[eps_val], v.device())?.to_dtype(v.dtype())?.unsqueeze(0)?;
    let norm = v.sqr()?.sum_keepdim(1)?.sqrt()?.broadcast_add(&eps)?;
    Ok(v.broadcast_div(&norm)?)
}

/// Masked mean pooling over the token axis followed by L2 normalization.
/// `hidden` is `[B,T,H]`, `attention_mask` is `[B,T]` with 1 for real tokens.
pub fn masked_mean_l2(hidden: &Tensor, attention_mask: &Tensor) -> Result<Tensor> {
    let pooled = masked_mean(hidden, attention_mask)?;
    let normalized = l2_normalize(&pooled)?;
    assert_eq!(normalized.dims(), &[hidden.dims()[0], hidden.dims()[2]]);
    Ok(normalized)
}
