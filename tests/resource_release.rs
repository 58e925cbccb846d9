// Figures are counted process-wide, so this check lives in its own test
// binary where no other test allocates figures concurrently.

use serde_json::json;
use tableplot::{render, Column, Figure, RenderOptions, Table};

#[test]
fn test_mixed_renders_release_every_figure() {
    let table = Table::new(vec![
        Column::parsed("name", &["a", "b", "c"]),
        Column::numbers("value", &[1.0, 4.0, 2.0]),
        Column::numbers("zero", &[0.0, 0.0, 0.0]),
    ])
    .unwrap();
    let options = RenderOptions {
        dpi: 30,
        ..RenderOptions::default()
    };

    let requests = [
        json!({"plot_type": "scatter", "x_data": "name", "y_data": "value"}),
        json!({"plot_type": "histogram", "data": "value", "bins": 3}),
        // Fails after the figure is allocated
        json!({"plot_type": "pie", "sizes": "zero", "labels": "name"}),
        json!({"plot_type": "pie", "sizes": "value", "labels": "name"}),
        json!({"plot_type": "unsupported_kind"}),
        json!({"plot_type": "line", "x_data": "name", "y_data": "missing"}),
    ];

    let baseline = Figure::live_count();
    let mut failures = 0;
    for i in 0..1000 {
        if render(&table, &requests[i % requests.len()], &options).is_err() {
            failures += 1;
        }
    }

    // Requests 2, 4 and 5 of each cycle fail
    let expected = (0..1000).filter(|i| [2, 4, 5].contains(&(i % requests.len()))).count();
    assert_eq!(failures, expected);
    assert_eq!(Figure::live_count(), baseline);
}
