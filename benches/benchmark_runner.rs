/// Benchmark runner for transparent proxies.
///
/// Compares operations on proxied values against the same operations on the
/// bare values.

extern crate just_proxy;

use just_proxy::runner::context::EvalContext;
use just_proxy::runner::ds::object_property::PropertyKey;
use just_proxy::runner::ds::operations::arithmetic::add_values;
use just_proxy::runner::ds::operations::object::{get_v, invoke};
use just_proxy::runner::ds::transparent_proxy::TransparentProxy;
use just_proxy::runner::ds::value::JsValue;
use std::time::{Duration, Instant};

type Workload = fn(&mut EvalContext, &JsValue) -> JsValue;

/// Run `workload` against a fresh value `iterations` times.
fn run_benchmark(
    workload: Workload,
    make_value: &dyn Fn() -> JsValue,
    iterations: u32,
) -> (Duration, JsValue) {
    let mut ctx = EvalContext::new();
    let mut last = JsValue::Undefined;

    let start = Instant::now();
    for _ in 0..iterations {
        let value = make_value();
        last = workload(&mut ctx, &value);
    }
    (start.elapsed(), last)
}

fn proxied(value: JsValue) -> JsValue {
    JsValue::from(TransparentProxy::new(move |_| Ok(value.clone())))
}

// ============================================================================
// Workloads
// ============================================================================

fn add_five(ctx: &mut EvalContext, v: &JsValue) -> JsValue {
    add_values(ctx, v, &JsValue::from(5)).unwrap_or(JsValue::Undefined)
}

fn read_length_many(ctx: &mut EvalContext, v: &JsValue) -> JsValue {
    let key = PropertyKey::from("length");
    let mut last = JsValue::Undefined;
    for _ in 0..100 {
        last = get_v(ctx, v, &key).unwrap_or(JsValue::Undefined);
    }
    last
}

fn upper_case(ctx: &mut EvalContext, v: &JsValue) -> JsValue {
    invoke(ctx, v, "toUpperCase", vec![]).unwrap_or(JsValue::Undefined)
}

fn stringify(ctx: &mut EvalContext, v: &JsValue) -> JsValue {
    match ctx.get_global("JSON") {
        Ok(json) => invoke(ctx, &json, "stringify", vec![v.clone()]).unwrap_or(JsValue::Undefined),
        Err(_) => JsValue::Undefined,
    }
}

fn main() {
    println!("=======================================================");
    println!("  Transparent Proxy - Performance Benchmarks");
    println!("  Bare value vs proxied value");
    println!("=======================================================\n");

    let benchmarks: Vec<(&str, Workload, JsValue, u32)> = vec![
        ("Add (number)", add_five as Workload, JsValue::from(1.23), 10000),
        ("Add (string)", add_five as Workload, JsValue::from("string"), 10000),
        ("Length x100 (string)", read_length_many as Workload, JsValue::from("string"), 1000),
        ("toUpperCase", upper_case as Workload, JsValue::from("string"), 10000),
        ("JSON.stringify", stringify as Workload, JsValue::from("string"), 10000),
    ];

    println!("{:<30} {:>14} {:>14} {:>10}", "Benchmark", "Bare", "Proxied", "Overhead");
    println!("{}", "-".repeat(70));

    let mut total_bare = Duration::ZERO;
    let mut total_proxied = Duration::ZERO;
    let mut mismatches = vec![];

    for (name, workload, value, iterations) in &benchmarks {
        let bare_value = value.clone();
        let proxied_value = value.clone();
        let (bare_dur, bare_result) =
            run_benchmark(*workload, &move || bare_value.clone(), *iterations);
        let (proxied_dur, proxied_result) =
            run_benchmark(*workload, &move || proxied(proxied_value.clone()), *iterations);
        total_bare += bare_dur;
        total_proxied += proxied_dur;

        if bare_result != proxied_result {
            mismatches.push(*name);
        }

        let overhead = proxied_dur.as_secs_f64() / bare_dur.as_secs_f64();
        println!(
            "{:<30} {:>12.2?} {:>12.2?} {:>9.2}x",
            name, bare_dur, proxied_dur, overhead
        );
    }

    println!("{}", "-".repeat(70));
    let total_overhead = total_proxied.as_secs_f64() / total_bare.as_secs_f64();
    println!(
        "{:<30} {:>12.2?} {:>12.2?} {:>9.2}x",
        "TOTAL", total_bare, total_proxied, total_overhead
    );

    println!("\n=======================================================");
    println!("  Correctness Verification");
    println!("=======================================================\n");

    if mismatches.is_empty() {
        println!("All proxied results match the bare results ✓");
    } else {
        for name in mismatches {
            println!("{:<30} ✗ proxied result differs", name);
        }
    }
}
