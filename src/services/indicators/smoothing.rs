// File: src/services/indicators/smoothing.rs

/// Простая скользящая средняя с минимальным периодом 1.
/// NaN внутри окна пропускаются; если в окне нет ни одного значения, результат NaN.
pub fn rolling_mean(values: &[f64], window: usize) -> Vec<f64> {
    let window = window.max(1);
    let mut out = Vec::with_capacity(values.len());
    let mut sum = 0.0;
    let mut count = 0usize;

    for i in 0..values.len() {
        if !values[i].is_nan() {
            sum += values[i];
            count += 1;
        }
        if i >= window {
            let leaving = values[i - window];
            if !leaving.is_nan() {
                sum -= leaving;
                count -= 1;
            }
        }
        out.push(if count > 0 { sum / count as f64 } else { f64::NAN });
    }

    out
}

/// Экспоненциальное среднее без поправки смещения (y0 = x0, y = y + alpha * (x - y)).
/// Ведущие NaN пропускаются, значение выдается после `min_periods` наблюдений.
pub fn ewm_mean(values: &[f64], alpha: f64, min_periods: usize) -> Vec<f64> {
    let min_periods = min_periods.max(1);
    let mut out = vec![f64::NAN; values.len()];
    let mut state: Option<f64> = None;
    let mut observed = 0usize;

    for (i, &value) in values.iter().enumerate() {
        if !value.is_nan() {
            state = Some(match state {
                Some(prev) => prev + alpha * (value - prev),
                None => value,
            });
            observed += 1;
        }
        if observed >= min_periods {
            if let Some(current) = state {
                out[i] = current;
            }
        }
    }

    out
}

/// Коэффициент сглаживания для EMA с заданным span
pub fn span_alpha(span: usize) -> f64 {
    2.0 / (span as f64 + 1.0)
}
