/*!

This is the long-form manual for `top_ranking` and `mbtitop`.

## Input formats

The following formats are supported:
* `csv` Comma Separated Values (the default)
* `xlsx` Excel spreadsheets

In both cases the first row is the header. The first column holds the identifier
of each row (the country), and every other column holds one numeric value per row
(the share of the population with a given personality type):

| Country | ESTJ   | ENFP   | ... |
|---------|--------|--------|-----|
| Albania | 0.0934 | 0.0452 |     |
| Brazil  | 0.0713 | 0.0813 |     |
| ...     |        |        |     |

The value columns are whatever the header contains: nothing is hard-coded about the
sixteen personality types.

Empty cells and the usual missing-value markers (`NA`, `N/A`, `NaN`, `null`, `#N/A`, ...)
are accepted. A row with a missing value is never ranked for that column.

The following inputs are rejected:
- a file without a header, or with a header whose value labels are all numbers
  (this is a data row, not a header)
- a header with only the identifier column
- a row that does not have one cell per header column
- a value that is neither a number nor a missing-value marker

### `xlsx`

Error cells such as `#N/A` are missing values.
The first worksheet is read, unless another one is named with `--excel-worksheet-name`
(or `excelWorksheetName` in the configuration file).

## Uploads

When the default file does not exist, `mbtitop --upload` asks for the path of a file
to use instead. Files ending in `.csv` (or without extension) are read as CSV, files
ending in `.xlsx` as Excel. Any other file is rejected.

If nothing is uploaded, the program only prints an informational message.

## Output

The chart is written as a [Vega-Lite](https://vega.github.io/vega-lite/) document that any
Vega-Lite renderer can draw:
- one horizontal bar per country, largest first
- the value axis goes from 0 to 10% above the largest value
- one tooltip per bar with the country and the value
- one color per country, without legend
- the value axis can be panned and zoomed

The SHA-256 fingerprint of the dataset is stored under `usermeta.datasetFingerprint`.

## Configuration file

All the keys are optional. Relative paths are resolved from the directory of the
configuration file. Command line flags take precedence.

```json
{
  "outputSettings": {
    "title": "Top 10 countries by share of a personality type",
    "outputPath": "chart.json"
  },
  "dataSource": {
    "provider": "csv",
    "filePath": "countriesMBTI_16types.csv"
  },
  "selection": { "mbtiType": "INFJ" }
}
```

## Interactive mode

With `--interactive`, each line read from the standard input selects a new type and
prints the corresponding chart. An empty line or the end of the input stops the program.
An invalid choice is reported and the previous chart stays current.

Until there is a dataset, `mbtitop --upload --interactive` reads upload paths instead:
each line is the path of a file to upload, and the first chart is printed as soon as one
is read. Without `--upload`, the program stops after the informational message.

*/
