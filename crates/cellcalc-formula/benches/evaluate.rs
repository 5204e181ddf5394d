use cellcalc_core::Sheet;
use cellcalc_formula::{evaluate, parse_formula, EvaluationContext, FormulaEngine, FunctionRegistry};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

const FORMULAS: &[&str] = &[
    "=1+2*3-4/5",
    "=SUM(A1:A100)/COUNT(A1:A100)",
    "=IF(AND(A1>10,A2<500),CONCATENATE(\"row \",A3),\"none\")",
    "=SUMIF(A1:A100,\">50\")+COUNTIF(A1:A100,\"<=25\")",
];

fn build_sheet() -> Sheet {
    let mut sheet = Sheet::new();
    for row in 1..=100 {
        sheet.set_value(&format!("A{}", row), row);
    }
    sheet
}

fn bench_cold(c: &mut Criterion) {
    let sheet = build_sheet();
    let registry = FunctionRegistry::new();
    let ctx = EvaluationContext::new(&sheet, &registry);

    c.bench_function("parse_and_evaluate", |b| {
        b.iter(|| {
            for formula in FORMULAS {
                let ast = parse_formula(black_box(formula)).unwrap();
                black_box(evaluate(&ast, &ctx));
            }
        })
    });
}

fn bench_cached(c: &mut Criterion) {
    let sheet = build_sheet();
    let mut engine = FormulaEngine::new();

    c.bench_function("cached_evaluate", |b| {
        b.iter(|| {
            for formula in FORMULAS {
                black_box(engine.evaluate(black_box(formula), &sheet).unwrap());
            }
        })
    });
}

criterion_group!(benches, bench_cold, bench_cached);
criterion_main!(benches);
