/// Console usage text
pub fn execute() -> String {
    [
        "RevAnalytica - Market Overview",
        "",
        "Selection",
        "  hotels            list eligible hotels and what is selected",
        "  toggle <hotel>    add or remove one hotel",
        "  all               select all hotels",
        "  none              unselect all hotels",
        "",
        "Chart",
        "  refresh           fetch market data again (Update Chart)",
        "  table             prices per date",
        "  render [path]     write the chart PNG",
        "  status            selection and data summary",
        "",
        "  help              show this message",
        "  quit              exit",
    ]
    .join("\n")
}
